//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::not_empty_trimmed;

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account name.
    #[validate(custom(function = not_empty_trimmed))]
    pub name: String,
    /// Password.
    #[validate(custom(function = not_empty_trimmed))]
    pub password: String,
}

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Account name.
    #[validate(custom(function = not_empty_trimmed))]
    pub name: String,
    /// Password.
    #[validate(custom(function = not_empty_trimmed))]
    pub password: String,
}

/// New post request.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    /// Post title.
    pub title: String,
    /// Post subtitle. May be empty.
    #[serde(default)]
    pub subtitle: String,
}

/// New comment request.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    /// Comment content.
    pub content: String,
}

/// Account edit request.
#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    /// New account name.
    pub name: String,
    /// New password.
    pub password: String,
}
