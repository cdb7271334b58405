//! Client error types.

use thiserror::Error;

/// Errors surfaced by the chat client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    /// The session's writer has stopped (socket closed)
    #[error("Session closed")]
    Closed,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Terminal input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
