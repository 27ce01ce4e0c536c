//! Response DTOs for Web API.

use serde::Serialize;

use crate::db::User;
use crate::forum::{Comment, ForumStats, Post};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain message response for operations without a payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

/// User information in responses. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Account name.
    pub name: String,
    /// User role.
    pub role: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role.to_string(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
    /// User information.
    pub user: UserInfo,
}

/// Session presence response for the public landing pages.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Whether the request carried a valid session.
    pub logged_in: bool,
    /// The session's user, when logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

/// Account edit response.
///
/// `token` is present only when the edit invalidated the caller's own
/// session and a replacement was issued.
#[derive(Debug, Serialize)]
pub struct EditUserResponse {
    /// Updated user information.
    pub user: UserInfo,
    /// Replacement session token, if one was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// ============================================================================
// Forum DTOs
// ============================================================================

/// Post information in responses.
#[derive(Debug, Serialize)]
pub struct PostInfo {
    /// Post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post subtitle.
    pub subtitle: String,
    /// Author's user ID.
    pub user_id: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&Post> for PostInfo {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            user_id: post.user_id,
            created_at: post.created_at.clone(),
        }
    }
}

/// Comment information in responses.
#[derive(Debug, Serialize)]
pub struct CommentInfo {
    /// Comment ID.
    pub id: i64,
    /// Comment content.
    pub content: String,
    /// Author's user ID.
    pub user_id: i64,
    /// The post this comment belongs to.
    pub post_id: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&Comment> for CommentInfo {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            user_id: comment.user_id,
            post_id: comment.post_id,
            created_at: comment.created_at.clone(),
        }
    }
}

/// A post together with its comments.
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    /// The post.
    pub post: PostInfo,
    /// Comments in creation order.
    pub comments: Vec<CommentInfo>,
}

/// Post count response.
#[derive(Debug, Serialize)]
pub struct PostCountResponse {
    /// Total number of posts.
    pub count: i64,
}

// ============================================================================
// Community DTOs
// ============================================================================

/// Aggregate counts in the community overview.
#[derive(Debug, Serialize)]
pub struct StatsInfo {
    /// Number of registered accounts.
    pub user_count: i64,
    /// Number of posts.
    pub post_count: i64,
    /// Number of comments.
    pub comment_count: i64,
}

impl From<ForumStats> for StatsInfo {
    fn from(stats: ForumStats) -> Self {
        Self {
            user_count: stats.user_count,
            post_count: stats.post_count,
            comment_count: stats.comment_count,
        }
    }
}

/// Community overview response.
#[derive(Debug, Serialize)]
pub struct CommunityResponse {
    /// All registered users in registration order.
    pub users: Vec<UserInfo>,
    /// Aggregate counts.
    pub stats: StatsInfo,
}
