//! User repository for Agora.
//!
//! This module provides CRUD operations for users in the database.

use sqlx::{QueryBuilder, SqlitePool};

use super::user::{NewUser, User, UserUpdate};
use crate::{AgoraError, Result};

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID. A name collision
    /// (case-insensitive) surfaces as `AgoraError::Duplicate`.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, password, role) VALUES (?, ?, ?)")
            .bind(&new_user.name)
            .bind(&new_user.password)
            .bind(new_user.role.as_str())
            .execute(self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AgoraError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, password, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a user by name (case-insensitive).
    pub async fn get_by_name(&self, name: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, password, role, created_at FROM users WHERE name = ? COLLATE NOCASE",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Update a user by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a user by ID.
    ///
    /// Returns true if a user was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all users in registration order.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, password, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }

    /// Check if a name is already taken (case-insensitive).
    pub async fn name_exists(&self, name: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE name = ? COLLATE NOCASE)")
                .bind(name)
                .fetch_one(self.pool)
                .await?;
        Ok(exists.0)
    }

    /// Check if any administrator account exists.
    pub async fn admin_exists(&self) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE role = ?)")
            .bind(super::Role::Admin.as_str())
            .fetch_one(self.pool)
            .await?;
        Ok(exists.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let new_user = NewUser::new("testuser", "hashedpw");
        let user = repo.create(&new_user).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "testuser");
        assert_eq!(user.role, Role::Member);
        assert!(!user.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_create_user_with_role() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let new_user = NewUser::new("admin", "hashedpw").with_role(Role::Admin);
        let user = repo.create(&new_user).await.unwrap();

        assert_eq!(user.name, "admin");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("testuser", "hashedpw"))
            .await
            .unwrap();

        let result = repo.create(&NewUser::new("testuser", "otherpw")).await;
        assert!(matches!(result, Err(AgoraError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_different_case() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("TestUser", "hashedpw"))
            .await
            .unwrap();

        let result = repo.create(&NewUser::new("testuser", "otherpw")).await;
        assert!(matches!(result, Err(AgoraError::Duplicate(_))));

        let result = repo.create(&NewUser::new("TESTUSER", "otherpw")).await;
        assert!(matches!(result, Err(AgoraError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let created = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "testuser");

        let not_found = repo.get_by_id(999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_case_insensitive() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("TestUser", "hashedpw"))
            .await
            .unwrap();

        for candidate in ["TestUser", "testuser", "TESTUSER", "tEsTuSeR"] {
            let found = repo.get_by_name(candidate).await.unwrap();
            assert!(found.is_some(), "lookup failed for {candidate}");
            assert_eq!(found.unwrap().name, "TestUser");
        }

        let not_found = repo.get_by_name("nonexistent").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_update_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        let update = UserUpdate::new().name("renamed").password("newhash");
        let updated = repo.update(user.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.password, "newhash");
        // Unchanged fields
        assert_eq!(updated.role, Role::Member);
    }

    #[tokio::test]
    async fn test_update_name_only() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        let update = UserUpdate::new().name("renamed");
        let updated = repo.update(user.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.password, "hashedpw");
    }

    #[tokio::test]
    async fn test_update_nonexistent_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let update = UserUpdate::new().name("renamed");
        let result = repo.update(999, &update).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_empty() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        let result = repo.update(user.id, &UserUpdate::new()).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "testuser");
    }

    #[tokio::test]
    async fn test_update_to_taken_name() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("alice", "pw")).await.unwrap();
        let bob = repo.create(&NewUser::new("bob", "pw")).await.unwrap();

        let update = UserUpdate::new().name("Alice");
        let result = repo.update(bob.id, &update).await;
        assert!(matches!(result, Err(AgoraError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("testuser", "hashedpw")).await.unwrap();

        let deleted = repo.delete(user.id).await.unwrap();
        assert!(deleted);

        let found = repo.get_by_id(user.id).await.unwrap();
        assert!(found.is_none());

        // Deleting again should return false
        let deleted_again = repo.delete(user.id).await.unwrap();
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn test_list_all_in_registration_order() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("zoe", "pw")).await.unwrap();
        repo.create(&NewUser::new("alice", "pw")).await.unwrap();
        repo.create(&NewUser::new("bob", "pw")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "zoe");
        assert_eq!(all[1].name, "alice");
        assert_eq!(all[2].name, "bob");
    }

    #[tokio::test]
    async fn test_count() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&NewUser::new("user1", "pw")).await.unwrap();
        repo.create(&NewUser::new("user2", "pw")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_name_exists_case_insensitive() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(!repo.name_exists("TestUser").await.unwrap());

        repo.create(&NewUser::new("TestUser", "pw")).await.unwrap();

        assert!(repo.name_exists("TestUser").await.unwrap());
        assert!(repo.name_exists("testuser").await.unwrap());
        assert!(repo.name_exists("TESTUSER").await.unwrap());
        assert!(!repo.name_exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_exists() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(!repo.admin_exists().await.unwrap());

        repo.create(&NewUser::new("member", "pw")).await.unwrap();
        assert!(!repo.admin_exists().await.unwrap());

        repo.create(&NewUser::new("root", "pw").with_role(Role::Admin))
            .await
            .unwrap();
        assert!(repo.admin_exists().await.unwrap());
    }
}
