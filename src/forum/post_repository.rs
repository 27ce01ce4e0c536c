//! Post repository for Agora.
//!
//! This module provides CRUD operations for posts in the database.

use sqlx::SqlitePool;

use super::post::{NewPost, Post};
use crate::{AgoraError, Result};

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let result = sqlx::query("INSERT INTO posts (title, subtitle, user_id) VALUES (?, ?, ?)")
            .bind(&new_post.title)
            .bind(&new_post.subtitle)
            .bind(new_post.user_id)
            .execute(self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let result = sqlx::query_as::<_, Post>(
            "SELECT id, title, subtitle, user_id, created_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List all posts in creation order.
    pub async fn list_all(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, title, subtitle, user_id, created_at FROM posts ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Count all posts.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }

    /// Check whether the author already submitted this exact post.
    pub async fn exists_duplicate(
        &self,
        user_id: i64,
        title: &str,
        subtitle: &str,
    ) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE user_id = ? AND title = ? AND subtitle = ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(subtitle)
        .fetch_one(self.pool)
        .await?;
        Ok(exists.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("author", "hash"))
            .await
            .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_create_post() {
        let (db, author_id) = setup().await;
        let repo = PostRepository::new(db.pool());

        let post = repo
            .create(&NewPost::new("Hello", "World", author_id))
            .await
            .unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.subtitle, "World");
        assert_eq!(post.user_id, author_id);
        assert!(!post.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (db, author_id) = setup().await;
        let repo = PostRepository::new(db.pool());

        let created = repo
            .create(&NewPost::new("Hello", "World", author_id))
            .await
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().title, "Hello");

        let not_found = repo.get_by_id(999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_list_all_in_creation_order() {
        let (db, author_id) = setup().await;
        let repo = PostRepository::new(db.pool());

        for i in 1..=3 {
            repo.create(&NewPost::new(format!("Post {i}"), "", author_id))
                .await
                .unwrap();
        }

        let posts = repo.list_all().await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].title, "Post 1");
        assert_eq!(posts[2].title, "Post 3");
    }

    #[tokio::test]
    async fn test_count() {
        let (db, author_id) = setup().await;
        let repo = PostRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&NewPost::new("One", "", author_id))
            .await
            .unwrap();
        repo.create(&NewPost::new("Two", "", author_id))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exists_duplicate() {
        let (db, author_id) = setup().await;
        let repo = PostRepository::new(db.pool());

        repo.create(&NewPost::new("Hello", "World", author_id))
            .await
            .unwrap();

        assert!(repo
            .exists_duplicate(author_id, "Hello", "World")
            .await
            .unwrap());
        assert!(!repo
            .exists_duplicate(author_id, "Hello", "Other")
            .await
            .unwrap());
        assert!(!repo
            .exists_duplicate(999, "Hello", "World")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate() {
        let (db, author_id) = setup().await;
        let repo = PostRepository::new(db.pool());

        let new_post = NewPost::new("Hello", "World", author_id);
        repo.create(&new_post).await.unwrap();

        let result = repo.create(&new_post).await;
        assert!(matches!(result, Err(AgoraError::Duplicate(_))));
    }
}
