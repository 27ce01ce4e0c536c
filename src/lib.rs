//! Agora - a small multi-user forum.
//!
//! A JSON API over SQLite with session authentication and a WebSocket
//! event stream that announces every new post and comment.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod forum;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, register, register_with_role, validate_name, validate_password,
    verify_password, AuthSession, LimitResult, LoginLimiter, PasswordError, RegistrationError,
    SessionError, SessionManager,
};
pub use config::Config;
pub use db::{Database, NewUser, Role, User, UserRepository, UserUpdate};
pub use error::{AgoraError, Result};
pub use forum::{Comment, ForumEvent, ForumService, ForumStats, Post};
pub use web::WebServer;
