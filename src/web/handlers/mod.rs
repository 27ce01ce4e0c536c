//! API handlers for the Web API.

pub mod auth;
pub mod posts;
pub mod users;

pub use auth::*;
pub use posts::*;
pub use users::*;
