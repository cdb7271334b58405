//! Agora chat server library.
//!
//! Room-scoped real-time messaging over WebSocket: connections join a room,
//! messages are appended to the room's history and fanned out to the other
//! members, and typing indicators are relayed without being stored.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::run as run_server;
