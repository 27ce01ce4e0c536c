//! Web API module for Agora.
//!
//! This module provides the REST API and the WebSocket event stream,
//! which together are the entire outward surface of the forum.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
