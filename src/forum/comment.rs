//! Comment model for Agora.

/// Comment entity attached to a post.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID.
    pub id: i64,
    /// Comment text.
    pub content: String,
    /// ID of the user who wrote the comment.
    pub user_id: i64,
    /// ID of the post this comment belongs to.
    pub post_id: i64,
    /// Comment creation timestamp.
    pub created_at: String,
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Comment text.
    pub content: String,
    /// ID of the user writing the comment.
    pub user_id: i64,
    /// ID of the parent post.
    pub post_id: i64,
}

impl NewComment {
    /// Create a new comment with required fields.
    pub fn new(content: impl Into<String>, user_id: i64, post_id: i64) -> Self {
        Self {
            content: content.into(),
            user_id,
            post_id,
        }
    }
}
