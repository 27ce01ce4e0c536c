//! Error types for Agora.

use thiserror::Error;

/// Common error type for Agora.
#[derive(Error, Debug)]
pub enum AgoraError {
    /// Database error.
    ///
    /// Wraps errors from sqlx; converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate resource (unique constraint or duplicate submission).
    #[error("{0} already exists")]
    Duplicate(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors. Unique-constraint violations become Duplicate
// so a lost race on a duplicate check still maps to a conflict.
impl From<sqlx::Error> for AgoraError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return AgoraError::Duplicate("record".to_string());
            }
        }
        AgoraError::Database(e.to_string())
    }
}

impl From<crate::auth::PasswordError> for AgoraError {
    fn from(e: crate::auth::PasswordError) -> Self {
        use crate::auth::PasswordError;
        match e {
            PasswordError::Empty | PasswordError::TooLong => {
                AgoraError::Validation(e.to_string())
            }
            _ => AgoraError::Auth(e.to_string()),
        }
    }
}

impl From<crate::auth::RegistrationError> for AgoraError {
    fn from(e: crate::auth::RegistrationError) -> Self {
        use crate::auth::RegistrationError;
        match e {
            RegistrationError::NameTaken => AgoraError::Duplicate("username".to_string()),
            RegistrationError::NameEmpty | RegistrationError::NameTooLong => {
                AgoraError::Validation(e.to_string())
            }
            RegistrationError::Password(p) => p.into(),
            RegistrationError::Database(msg) => AgoraError::Database(msg),
        }
    }
}

/// Result type alias for Agora operations.
pub type Result<T> = std::result::Result<T, AgoraError>;
