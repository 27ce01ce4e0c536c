//! Comment repository for Agora.
//!
//! This module provides CRUD operations for comments in the database.

use sqlx::SqlitePool;

use super::comment::{Comment, NewComment};
use crate::{AgoraError, Result};

/// Repository for comment CRUD operations.
pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new comment.
    ///
    /// Returns the created comment with the assigned ID.
    pub async fn create(&self, new_comment: &NewComment) -> Result<Comment> {
        let result =
            sqlx::query("INSERT INTO comments (content, user_id, post_id) VALUES (?, ?, ?)")
                .bind(&new_comment.content)
                .bind(new_comment.user_id)
                .bind(new_comment.post_id)
                .execute(self.pool)
                .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("comment".to_string()))
    }

    /// Get a comment by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let result = sqlx::query_as::<_, Comment>(
            "SELECT id, content, user_id, post_id, created_at FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List comments on a post in creation order.
    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, content, user_id, post_id, created_at
             FROM comments WHERE post_id = ? ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }

    /// Count all comments.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }

    /// Check whether the commenter already submitted this exact comment.
    pub async fn exists_duplicate(
        &self,
        user_id: i64,
        post_id: i64,
        content: &str,
    ) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM comments WHERE user_id = ? AND post_id = ? AND content = ?)",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(self.pool)
        .await?;
        Ok(exists.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::forum::{NewPost, PostRepository};
    use crate::Database;

    async fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("author", "hash"))
            .await
            .unwrap();
        let post = PostRepository::new(db.pool())
            .create(&NewPost::new("Hello", "World", user.id))
            .await
            .unwrap();
        (db, user.id, post.id)
    }

    #[tokio::test]
    async fn test_create_comment() {
        let (db, user_id, post_id) = setup().await;
        let repo = CommentRepository::new(db.pool());

        let comment = repo
            .create(&NewComment::new("Nice post", user_id, post_id))
            .await
            .unwrap();

        assert_eq!(comment.id, 1);
        assert_eq!(comment.content, "Nice post");
        assert_eq!(comment.user_id, user_id);
        assert_eq!(comment.post_id, post_id);
        assert!(!comment.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (db, user_id, post_id) = setup().await;
        let repo = CommentRepository::new(db.pool());

        let created = repo
            .create(&NewComment::new("Nice post", user_id, post_id))
            .await
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().content, "Nice post");

        let not_found = repo.get_by_id(999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_list_by_post() {
        let (db, user_id, post_id) = setup().await;
        let repo = CommentRepository::new(db.pool());

        for i in 1..=3 {
            repo.create(&NewComment::new(format!("Comment {i}"), user_id, post_id))
                .await
                .unwrap();
        }

        let comments = repo.list_by_post(post_id).await.unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].content, "Comment 1");
        assert_eq!(comments[2].content, "Comment 3");

        let empty = repo.list_by_post(999).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_count() {
        let (db, user_id, post_id) = setup().await;
        let repo = CommentRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&NewComment::new("One", user_id, post_id))
            .await
            .unwrap();
        repo.create(&NewComment::new("Two", user_id, post_id))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exists_duplicate() {
        let (db, user_id, post_id) = setup().await;
        let repo = CommentRepository::new(db.pool());

        repo.create(&NewComment::new("Nice post", user_id, post_id))
            .await
            .unwrap();

        assert!(repo
            .exists_duplicate(user_id, post_id, "Nice post")
            .await
            .unwrap());
        assert!(!repo
            .exists_duplicate(user_id, post_id, "Other text")
            .await
            .unwrap());
        assert!(!repo
            .exists_duplicate(999, post_id, "Nice post")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate() {
        let (db, user_id, post_id) = setup().await;
        let repo = CommentRepository::new(db.pool());

        let new_comment = NewComment::new("Nice post", user_id, post_id);
        repo.create(&new_comment).await.unwrap();

        let result = repo.create(&new_comment).await;
        assert!(matches!(result, Err(AgoraError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_requires_existing_post() {
        let (db, user_id, _) = setup().await;
        let repo = CommentRepository::new(db.pool());

        let result = repo.create(&NewComment::new("Orphan", user_id, 999)).await;
        assert!(result.is_err());
    }
}
