//! Authentication module for Agora.
//!
//! Handles password hashing, user registration, and session management.

mod password;
mod registration;
mod session;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    RESET_PASSWORD,
};
pub use registration::{
    register, register_with_role, validate_name, RegistrationError, MAX_NAME_LENGTH,
};
pub use session::{
    AuthSession, LimitResult, LoginLimiter, SessionError, SessionManager,
    DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_SESSION_DURATION_SECS, LOCKOUT_DURATION_SECS,
    MAX_LOGIN_ATTEMPTS,
};
