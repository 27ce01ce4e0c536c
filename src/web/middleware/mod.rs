//! Middleware for Web API.

pub mod auth;
pub mod cors;

pub use auth::{inject_state, AdminUser, AuthUser, OptionalAuthUser};
pub use cors::create_cors_layer;
