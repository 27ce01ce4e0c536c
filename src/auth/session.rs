//! Authentication session management for Agora.
//!
//! This module provides session tokens, login/logout functionality,
//! and login attempt rate limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::User;

/// Session-related errors.
///
/// Unknown-name and wrong-password failures are deliberately distinct;
/// the login page reports them with different messages.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No user with that name exists.
    #[error("that username does not exist, please try again")]
    UnknownUser,

    /// Password did not match.
    #[error("wrong password, please try again")]
    WrongPassword,

    /// Account is locked due to too many failed attempts.
    #[error("account locked for {0} seconds")]
    AccountLocked(u64),

    /// Session has expired.
    #[error("session expired")]
    SessionExpired,

    /// Session not found.
    #[error("session not found")]
    SessionNotFound,
}

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

/// Default idle timeout (30 minutes).
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// Maximum login attempts before lockout.
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Lockout duration (5 minutes).
pub const LOCKOUT_DURATION_SECS: u64 = 5 * 60;

/// Authentication session representing a logged-in user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Unique session token (UUID v4).
    pub token: String,
    /// User ID associated with this session.
    pub user_id: i64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires (absolute timeout).
    pub expires_at: DateTime<Utc>,
    /// Last activity timestamp (for idle timeout).
    last_activity: Instant,
}

impl AuthSession {
    /// Create a new authentication session for a user.
    pub fn new(user_id: i64) -> Self {
        Self::with_duration(user_id, Duration::from_secs(DEFAULT_SESSION_DURATION_SECS))
    }

    /// Create a new session with a custom duration.
    pub fn with_duration(user_id: i64, duration: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(duration).unwrap_or_default();

        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at,
            last_activity: Instant::now(),
        }
    }

    /// Check if the session has expired (absolute timeout).
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the session has been idle too long.
    pub fn is_idle(&self, idle_timeout: Duration) -> bool {
        self.last_activity.elapsed() >= idle_timeout
    }

    /// Check if the session is still valid (not expired and not idle).
    pub fn is_valid(&self, idle_timeout: Duration) -> bool {
        !self.is_expired() && !self.is_idle(idle_timeout)
    }

    /// Update the last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Get the time since last activity.
    pub fn idle_time(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

/// Result of a login attempt rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitResult {
    /// Login attempt is allowed.
    Allowed,
    /// Account is locked for the specified duration.
    Locked(Duration),
}

/// Login attempt rate limiter.
///
/// Tracks failed login attempts per username and enforces lockout
/// after too many failures.
#[derive(Debug)]
pub struct LoginLimiter {
    /// Failed attempts per username: (username -> list of attempt times).
    attempts: HashMap<String, Vec<Instant>>,
    /// Maximum attempts before lockout.
    max_attempts: u32,
    /// Time window for counting attempts.
    window: Duration,
    /// Lockout duration after exceeding max attempts.
    lockout: Duration,
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginLimiter {
    /// Create a new limiter with default settings.
    pub fn new() -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts: MAX_LOGIN_ATTEMPTS,
            window: Duration::from_secs(LOCKOUT_DURATION_SECS),
            lockout: Duration::from_secs(LOCKOUT_DURATION_SECS),
        }
    }

    /// Create a limiter with custom settings.
    pub fn with_config(max_attempts: u32, window_secs: u64, lockout_secs: u64) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            window: Duration::from_secs(window_secs),
            lockout: Duration::from_secs(lockout_secs),
        }
    }

    /// Check if a login attempt is allowed for the given username.
    pub fn check(&mut self, username: &str) -> LimitResult {
        let now = Instant::now();
        let key = username.to_lowercase();

        // Get or create the attempts list
        let attempts = self.attempts.entry(key).or_default();

        // Remove expired attempts
        attempts.retain(|t| now.duration_since(*t) < self.window);

        // Check if locked out
        if attempts.len() >= self.max_attempts as usize {
            if let Some(oldest) = attempts.first() {
                let elapsed = now.duration_since(*oldest);
                if elapsed < self.lockout {
                    let remaining = self.lockout - elapsed;
                    return LimitResult::Locked(remaining);
                }
                // Lockout expired, clear attempts
                attempts.clear();
            }
        }

        LimitResult::Allowed
    }

    /// Record a failed login attempt.
    pub fn record_failure(&mut self, username: &str) {
        let key = username.to_lowercase();
        let now = Instant::now();

        let attempts = self.attempts.entry(key).or_default();

        // Clean old attempts first
        attempts.retain(|t| now.duration_since(*t) < self.window);

        // Record this failure
        attempts.push(now);

        debug!(
            username = %username,
            attempt_count = attempts.len(),
            "Recorded failed login attempt"
        );
    }

    /// Clear all attempts for a username (call on successful login).
    pub fn clear(&mut self, username: &str) {
        let key = username.to_lowercase();
        self.attempts.remove(&key);
    }

    /// Get the number of failed attempts for a username.
    pub fn attempt_count(&mut self, username: &str) -> usize {
        let now = Instant::now();
        let key = username.to_lowercase();

        if let Some(attempts) = self.attempts.get_mut(&key) {
            attempts.retain(|t| now.duration_since(*t) < self.window);
            attempts.len()
        } else {
            0
        }
    }

    /// Clean up expired entries to prevent memory growth.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        self.attempts.retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < self.window);
            !attempts.is_empty()
        });
    }
}

/// Session manager for tracking active sessions.
#[derive(Debug)]
pub struct SessionManager {
    /// Active sessions by token.
    sessions: HashMap<String, AuthSession>,
    /// Login attempt limiter.
    limiter: LoginLimiter,
    /// Absolute session duration.
    session_duration: Duration,
    /// Idle timeout duration.
    idle_timeout: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a new session manager with default settings.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_SESSION_DURATION_SECS, DEFAULT_IDLE_TIMEOUT_SECS)
    }

    /// Create a session manager with custom timeouts.
    pub fn with_config(duration_secs: u64, idle_timeout_secs: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            limiter: LoginLimiter::new(),
            session_duration: Duration::from_secs(duration_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
        }
    }

    /// Attempt to log in a user.
    ///
    /// The caller resolves `username` to a `User` row first (or None if no
    /// such user); this keeps the manager free of database access. Returns
    /// an `AuthSession` on success.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        user: Option<&User>,
    ) -> Result<AuthSession, SessionError> {
        // Check rate limit
        match self.limiter.check(username) {
            LimitResult::Locked(remaining) => {
                warn!(
                    username = %username,
                    remaining_secs = remaining.as_secs(),
                    "Login attempt blocked: account locked"
                );
                return Err(SessionError::AccountLocked(remaining.as_secs()));
            }
            LimitResult::Allowed => {}
        }

        // Check if user exists
        let user = match user {
            Some(u) => u,
            None => {
                self.limiter.record_failure(username);
                warn!(username = %username, "Login failed: user not found");
                return Err(SessionError::UnknownUser);
            }
        };

        // Verify password
        match crate::auth::verify_password(password, &user.password) {
            Ok(()) => {
                self.limiter.clear(username);

                let session = self.create_session(user.id);

                info!(
                    username = %username,
                    user_id = user.id,
                    "Login successful"
                );

                Ok(session)
            }
            Err(_) => {
                self.limiter.record_failure(username);
                warn!(username = %username, "Login failed: wrong password");
                Err(SessionError::WrongPassword)
            }
        }
    }

    /// Create and register a session for a user.
    ///
    /// Used directly for the auto-login after registration and for the
    /// token rotation after a self-edit.
    pub fn create_session(&mut self, user_id: i64) -> AuthSession {
        let session = AuthSession::with_duration(user_id, self.session_duration);
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Log out a session by token.
    pub fn logout(&mut self, token: &str) -> bool {
        if let Some(session) = self.sessions.remove(token) {
            info!(user_id = session.user_id, "Session logged out");
            true
        } else {
            debug!("Logout: session not found");
            false
        }
    }

    /// Log out all sessions for a user.
    pub fn logout_user(&mut self, user_id: i64) -> usize {
        let tokens_to_remove: Vec<_> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.user_id == user_id)
            .map(|(t, _)| t.clone())
            .collect();

        let count = tokens_to_remove.len();
        for token in tokens_to_remove {
            self.sessions.remove(&token);
        }

        if count > 0 {
            info!(
                user_id = user_id,
                count = count,
                "All user sessions logged out"
            );
        }

        count
    }

    /// Get a session by token, validating it is still active.
    pub fn get_session(&mut self, token: &str) -> Result<&AuthSession, SessionError> {
        match self.sessions.get(token) {
            None => Err(SessionError::SessionNotFound),
            Some(session) if !session.is_valid(self.idle_timeout) => {
                // Remove expired session
                self.sessions.remove(token);
                Err(SessionError::SessionExpired)
            }
            Some(_) => Ok(&self.sessions[token]),
        }
    }

    /// Get a session by token, updating its last activity.
    pub fn touch_session(&mut self, token: &str) -> Result<&AuthSession, SessionError> {
        self.get_session(token)?;

        // Still present and valid; update last activity
        if let Some(session) = self.sessions.get_mut(token) {
            session.touch();
        }

        Ok(&self.sessions[token])
    }

    /// Clean up expired sessions, returning how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.sessions.len();

        self.sessions.retain(|_, s| s.is_valid(self.idle_timeout));

        self.limiter.cleanup();

        before - self.sessions.len()
    }

    /// Get the number of active sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Get the number of sessions for a specific user.
    pub fn user_session_count(&self, user_id: i64) -> usize {
        self.sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .count()
    }
}
