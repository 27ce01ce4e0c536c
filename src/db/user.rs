//! User model for Agora.
//!
//! Defines the User struct and the Role enum for permission management.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// User role for permission management.
///
/// Stored as lowercase TEXT in the users table. Administrative rights are
/// an explicit attribute of the account, never derived from its id or
/// registration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Regular member.
    #[default]
    Member,
    /// Administrator.
    Admin,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// User entity representing a registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name (unique, case-insensitive).
    pub name: String,
    /// Password hash (Argon2).
    pub password: String,
    /// User role for permissions.
    pub role: Role,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Check if this user has administrative rights.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Password hash (must be pre-hashed with Argon2).
    pub password: String,
    /// User role (defaults to Member).
    pub role: Role,
}

impl NewUser {
    /// Create a new user with the default member role.
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            role: Role::default(),
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Data for updating an existing user.
///
/// Only fields that are `Some` will be updated.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New password hash (must be pre-hashed with Argon2).
    pub password: Option<String>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a new password hash.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Check if the update contains no changes.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none()
    }
}
