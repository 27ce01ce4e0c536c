//! Forum service for Agora.
//!
//! This module provides high-level operations for posts, comments, and
//! account management with built-in permission checking. Destructive
//! operations that touch multiple tables run inside a transaction.

use tracing::{debug, info};

use crate::db::{Database, Role, User, UserRepository, UserUpdate};
use crate::{auth, AgoraError, Result};

use super::comment_repository::CommentRepository;
use super::post_repository::PostRepository;
use super::{Comment, NewComment, NewPost, Post};

/// Maximum length for post titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for post subtitles (in characters).
pub const MAX_SUBTITLE_LENGTH: usize = 200;

/// Maximum length for comments (in characters).
pub const MAX_COMMENT_LENGTH: usize = 200;

/// Validate a post title.
fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AgoraError::Validation(
            "Title must not be empty".to_string(),
        ));
    }
    let char_count = title.chars().count();
    if char_count > MAX_TITLE_LENGTH {
        return Err(AgoraError::Validation(format!(
            "Title is too long (max {} characters)",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

/// Validate a post subtitle. Empty subtitles are allowed.
fn validate_subtitle(subtitle: &str) -> Result<()> {
    let char_count = subtitle.chars().count();
    if char_count > MAX_SUBTITLE_LENGTH {
        return Err(AgoraError::Validation(format!(
            "Subtitle is too long (max {} characters)",
            MAX_SUBTITLE_LENGTH
        )));
    }
    Ok(())
}

/// Validate comment content.
fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AgoraError::Validation(
            "Comment must not be empty".to_string(),
        ));
    }
    let char_count = content.chars().count();
    if char_count > MAX_COMMENT_LENGTH {
        return Err(AgoraError::Validation(format!(
            "Comment is too long (max {} characters)",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(())
}

/// Aggregate counts for the community overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForumStats {
    /// Number of registered accounts.
    pub user_count: i64,
    /// Number of posts.
    pub post_count: i64,
    /// Number of comments.
    pub comment_count: i64,
}

/// Service for forum operations with permission checking.
pub struct ForumService<'a> {
    db: &'a Database,
}

impl<'a> ForumService<'a> {
    /// Create a new ForumService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    // ========== Post Operations ==========

    /// Create a new post.
    ///
    /// Rejects an exact resubmission (same author, title, and subtitle)
    /// with a duplicate error.
    pub async fn create_post(
        &self,
        author_id: i64,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Result<Post> {
        let title = title.into();
        let subtitle = subtitle.into();

        validate_title(&title)?;
        validate_subtitle(&subtitle)?;

        let repo = PostRepository::new(self.db.pool());
        if repo.exists_duplicate(author_id, &title, &subtitle).await? {
            return Err(AgoraError::Duplicate("post".to_string()));
        }

        let post = repo.create(&NewPost::new(title, subtitle, author_id)).await?;

        debug!(post_id = post.id, author_id = author_id, "Post created");

        Ok(post)
    }

    /// Create a new comment on a post.
    ///
    /// The post must exist. Rejects an exact resubmission (same author,
    /// post, and content) with a duplicate error.
    pub async fn create_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: impl Into<String>,
    ) -> Result<Comment> {
        let content = content.into();

        validate_content(&content)?;

        let post_repo = PostRepository::new(self.db.pool());
        post_repo
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))?;

        let repo = CommentRepository::new(self.db.pool());
        if repo.exists_duplicate(author_id, post_id, &content).await? {
            return Err(AgoraError::Duplicate("comment".to_string()));
        }

        let comment = repo
            .create(&NewComment::new(content, author_id, post_id))
            .await?;

        debug!(
            comment_id = comment.id,
            post_id = post_id,
            author_id = author_id,
            "Comment created"
        );

        Ok(comment)
    }

    /// List all posts in creation order.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let repo = PostRepository::new(self.db.pool());
        repo.list_all().await
    }

    /// Get the total number of posts.
    pub async fn post_count(&self) -> Result<i64> {
        let repo = PostRepository::new(self.db.pool());
        repo.count().await
    }

    /// Get a post along with its comments in creation order.
    pub async fn get_post(&self, post_id: i64) -> Result<(Post, Vec<Comment>)> {
        let post_repo = PostRepository::new(self.db.pool());
        let post = post_repo
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))?;

        let comment_repo = CommentRepository::new(self.db.pool());
        let comments = comment_repo.list_by_post(post_id).await?;

        Ok((post, comments))
    }

    // ========== Delete Operations ==========

    /// Delete a post and all comments attached to it.
    ///
    /// Permission rules:
    /// - The post author can delete their own post
    /// - Administrators can delete any post
    ///
    /// The comment cleanup and the post deletion are performed atomically
    /// within a transaction.
    pub async fn delete_post(&self, post_id: i64, actor_id: i64, actor_role: Role) -> Result<()> {
        let post_repo = PostRepository::new(self.db.pool());
        let post = post_repo
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))?;

        let is_owner = actor_id == post.user_id;
        let is_admin = actor_role == Role::Admin;

        if !is_owner && !is_admin {
            return Err(AgoraError::Permission(
                "You may not delete this post".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let comments_deleted = sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            post_id = post_id,
            actor_id = actor_id,
            comments_deleted = comments_deleted,
            "Post deleted"
        );

        Ok(())
    }

    /// Delete a single comment.
    ///
    /// Permission rules:
    /// - The comment author can delete their own comment
    /// - Administrators can delete any comment
    pub async fn delete_comment(
        &self,
        comment_id: i64,
        actor_id: i64,
        actor_role: Role,
    ) -> Result<()> {
        let repo = CommentRepository::new(self.db.pool());
        let comment = repo
            .get_by_id(comment_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("comment".to_string()))?;

        let is_owner = actor_id == comment.user_id;
        let is_admin = actor_role == Role::Admin;

        if !is_owner && !is_admin {
            return Err(AgoraError::Permission(
                "You may not delete this comment".to_string(),
            ));
        }

        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(self.db.pool())
            .await?;

        info!(
            comment_id = comment_id,
            actor_id = actor_id,
            "Comment deleted"
        );

        Ok(())
    }

    /// Delete a user account and everything it touched.
    ///
    /// Removes, in order: the user's comments, comments left by others on
    /// the user's posts, the user's posts, and finally the account itself.
    /// All four steps run in a single transaction.
    ///
    /// Permission rules:
    /// - Administrator accounts can never be deleted
    /// - Users can delete their own account
    /// - Administrators can delete any non-admin account
    pub async fn delete_user(&self, target_id: i64, actor_id: i64, actor_role: Role) -> Result<()> {
        let repo = UserRepository::new(self.db.pool());
        let target = repo
            .get_by_id(target_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("user".to_string()))?;

        if target.role == Role::Admin {
            return Err(AgoraError::Permission(
                "Administrator accounts cannot be deleted".to_string(),
            ));
        }

        let is_self = actor_id == target_id;
        let is_admin = actor_role == Role::Admin;

        if !is_self && !is_admin {
            return Err(AgoraError::Permission(
                "You may not delete this account".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let own_comments = sqlx::query("DELETE FROM comments WHERE user_id = ?")
            .bind(target_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let comments_on_posts = sqlx::query(
            "DELETE FROM comments WHERE post_id IN (SELECT id FROM posts WHERE user_id = ?)",
        )
        .bind(target_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let posts_deleted = sqlx::query("DELETE FROM posts WHERE user_id = ?")
            .bind(target_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            user_id = target_id,
            name = %target.name,
            actor_id = actor_id,
            posts_deleted = posts_deleted,
            comments_deleted = own_comments + comments_on_posts,
            "User account deleted"
        );

        Ok(())
    }

    // ========== Account Operations ==========

    /// Update a user's name and password.
    ///
    /// Permission rules:
    /// - Administrator accounts can never be edited through this path
    /// - Users can edit their own account
    /// - Administrators can edit any non-admin account
    ///
    /// The new name must pass registration validation and must not belong
    /// to a different account. Keeping the current name is allowed.
    pub async fn edit_user(
        &self,
        target_id: i64,
        actor_id: i64,
        actor_role: Role,
        name: &str,
        password: &str,
    ) -> Result<User> {
        let repo = UserRepository::new(self.db.pool());
        let target = repo
            .get_by_id(target_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("user".to_string()))?;

        if target.role == Role::Admin {
            return Err(AgoraError::Permission(
                "Administrator accounts cannot be edited".to_string(),
            ));
        }

        let is_self = actor_id == target_id;
        let is_admin = actor_role == Role::Admin;

        if !is_self && !is_admin {
            return Err(AgoraError::Permission(
                "You may not edit this account".to_string(),
            ));
        }

        auth::validate_name(name)?;
        auth::validate_password(password)?;

        // The name may collide with another account but not with the
        // target's own current name.
        if let Some(existing) = repo.get_by_name(name).await? {
            if existing.id != target_id {
                return Err(AgoraError::Duplicate("username".to_string()));
            }
        }

        let password_hash = auth::hash_password(password)?;

        let updated = repo
            .update(
                target_id,
                &UserUpdate::new().name(name).password(password_hash),
            )
            .await?
            .ok_or_else(|| AgoraError::NotFound("user".to_string()))?;

        info!(
            user_id = target_id,
            name = %updated.name,
            actor_id = actor_id,
            "User account updated"
        );

        Ok(updated)
    }

    /// Reset a user's password to the well-known recovery value.
    ///
    /// Only administrators may do this, and administrator accounts
    /// themselves cannot be reset.
    pub async fn reset_password(&self, target_id: i64, actor_role: Role) -> Result<()> {
        if actor_role != Role::Admin {
            return Err(AgoraError::Permission(
                "Only administrators may reset passwords".to_string(),
            ));
        }

        let repo = UserRepository::new(self.db.pool());
        let target = repo
            .get_by_id(target_id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("user".to_string()))?;

        if target.role == Role::Admin {
            return Err(AgoraError::Permission(
                "Administrator accounts cannot be reset".to_string(),
            ));
        }

        let password_hash = auth::hash_password(auth::RESET_PASSWORD)?;

        repo.update(target_id, &UserUpdate::new().password(password_hash))
            .await?
            .ok_or_else(|| AgoraError::NotFound("user".to_string()))?;

        info!(
            user_id = target_id,
            name = %target.name,
            "Password reset to default"
        );

        Ok(())
    }

    // ========== Community Overview ==========

    /// List all registered users in registration order.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let repo = UserRepository::new(self.db.pool());
        repo.list_all().await
    }

    /// Aggregate counts over users, posts, and comments.
    pub async fn stats(&self) -> Result<ForumStats> {
        let user_count = UserRepository::new(self.db.pool()).count().await?;
        let post_count = PostRepository::new(self.db.pool()).count().await?;
        let comment_count = CommentRepository::new(self.db.pool()).count().await?;

        Ok(ForumStats {
            user_count,
            post_count,
            comment_count,
        })
    }
}
