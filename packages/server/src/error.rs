//! Server error types.

use thiserror::Error;

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server terminated: {0}")]
    Serve(#[from] std::io::Error),
}
