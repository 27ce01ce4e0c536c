//! Data Transfer Objects for Web API.

pub mod request;
pub mod response;
mod validation;

pub use request::*;
pub use response::*;
pub use validation::ValidatedJson;
