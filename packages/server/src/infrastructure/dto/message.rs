//! Chat message as seen by clients.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// `{author, message, time}` as returned by the history endpoint and
/// carried by `receive_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub author: String,
    pub message: String,
    pub time: String,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            author: message.author.as_str().to_string(),
            message: message.body.as_str().to_string(),
            time: message.time.as_str().to_string(),
        }
    }
}
