//! User registration for Agora.

use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password, validate_password, PasswordError};
use crate::db::{NewUser, Role, User, UserRepository};

/// Maximum length for user names (in characters).
pub const MAX_NAME_LENGTH: usize = 50;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Name is empty.
    #[error("name must not be empty")]
    NameEmpty,

    /// Name is too long.
    #[error("name must be at most {MAX_NAME_LENGTH} characters")]
    NameTooLong,

    /// Name is already taken (case-insensitive).
    #[error("that name is already taken")]
    NameTaken,

    /// Password validation or hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), RegistrationError> {
    if name.trim().is_empty() {
        return Err(RegistrationError::NameEmpty);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(RegistrationError::NameTooLong);
    }
    Ok(())
}

/// Register a new user.
///
/// This function:
/// 1. Validates the name and password
/// 2. Checks if the name already exists (case-insensitive)
/// 3. Hashes the password
/// 4. Creates the user in the database
pub async fn register(
    repo: &UserRepository<'_>,
    name: &str,
    password: &str,
) -> Result<User, RegistrationError> {
    register_with_role(repo, name, password, Role::Member).await
}

/// Register a new user with a specific role.
///
/// This is used for seeding the administrator account at startup;
/// self-service registration always assigns `Role::Member`.
pub async fn register_with_role(
    repo: &UserRepository<'_>,
    name: &str,
    password: &str,
    role: Role,
) -> Result<User, RegistrationError> {
    validate_name(name)?;
    validate_password(password)?;

    if repo
        .name_exists(name)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(RegistrationError::NameTaken);
    }

    let password_hash = hash_password(password)?;

    let user = repo
        .create(&NewUser::new(name, &password_hash).with_role(role))
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?;

    info!(
        name = %user.name,
        user_id = user.id,
        role = %role,
        "New user registered"
    );

    Ok(user)
}
