//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} bytes (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// Author validation error
    #[error("Author cannot be empty")]
    AuthorEmpty,

    /// Author too long error
    #[error("Author cannot exceed {max} bytes (got {actual})")]
    AuthorTooLong { max: usize, actual: usize },

    /// MessageBody validation error
    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} bytes (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },

    /// DisplayTime validation error
    #[error("DisplayTime cannot be empty")]
    DisplayTimeEmpty,

    /// DisplayTime too long error
    #[error("DisplayTime cannot exceed {max} bytes (got {actual})")]
    DisplayTimeTooLong { max: usize, actual: usize },
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// A message was appended to a room it does not belong to
    #[error("Message for room '{message_room}' cannot be appended to room '{room}'")]
    RoomMismatch { room: String, message_room: String },
}

/// Errors returned by repositories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The connection is not registered
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),
}

/// Per-recipient failure while pushing an event to a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's outbound queue is full (slow consumer)
    #[error("Outbound queue of connection '{0}' is full")]
    QueueFull(String),

    /// The connection's writer has stopped (socket closed)
    #[error("Outbound queue of connection '{0}' is closed")]
    QueueClosed(String),

    /// The connection was unregistered before delivery
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),
}
