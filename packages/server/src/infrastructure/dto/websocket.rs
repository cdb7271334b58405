//! WebSocket message DTOs for the chat application.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use super::MessageDto;

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join a room by ID (leaving the current one, if any)
    JoinRoom(String),
    /// Leave the current room
    LeaveRoom,
    /// Send a chat message to a room
    SendMessage(SendMessagePayload),
    /// Raise or lower the typing indicator in a room
    Typing(TypingPayload),
}

/// Payload of `send_message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub room: String,
    pub message: String,
    /// Display name; `"Anonymous"` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Display time; filled in by the server when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Payload of `typing`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPayload {
    pub typing: bool,
    pub room: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message from another member of the room
    ReceiveMessage(MessageDto),
    /// Typing indicator state of another member
    DisplayTyping(bool),
    /// A request from this connection was rejected
    Error(ErrorPayload),
}

impl ServerEvent {
    /// Serialize to a text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Error category reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    BadRequest,
    Internal,
}

/// Payload of `error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
