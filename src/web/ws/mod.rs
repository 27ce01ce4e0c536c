//! WebSocket module for real-time event delivery.
//!
//! Every created post and comment is pushed to all connected clients.

pub mod events;
pub mod messages;

pub use events::events_handler;
pub use messages::ServerMessage;
