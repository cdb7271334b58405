//! Agora chat client library.
//!
//! An owned [`ChatSession`] over WebSocket, a [`TypingDebouncer`] for the
//! typing indicator, history loading over HTTP, and the terminal front end.

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod typing;
pub mod url;

pub use app::run as run_client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use history::fetch_history;
pub use session::{ChatSession, SessionHandle};
pub use typing::TypingDebouncer;
