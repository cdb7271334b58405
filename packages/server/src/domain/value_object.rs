//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a room identifier in bytes
pub const MAX_ROOM_ID_LEN: usize = 100;

/// Maximum length of an author display name in bytes
pub const MAX_AUTHOR_LEN: usize = 100;

/// Maximum length of a message body in bytes
pub const MAX_MESSAGE_BODY_LEN: usize = 10000;

/// Maximum length of a display time in bytes
pub const MAX_DISPLAY_TIME_LEN: usize = 64;

/// Author used when a client sends a message without a display name
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

fn check_len(
    value: &str,
    max: usize,
    empty: ValueObjectError,
    too_long: impl FnOnce(usize, usize) -> ValueObjectError,
) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(empty);
    }
    let len = value.len();
    if len > max {
        return Err(too_long(max, len));
    }
    Ok(())
}

/// Connection identifier value object.
///
/// Opaque session identifier assigned by the server when a client connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Caller-supplied name of a chat room (e.g. `"123"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Arguments
    ///
    /// * `id` - The room identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        check_len(
            &id,
            MAX_ROOM_ID_LEN,
            ValueObjectError::RoomIdEmpty,
            |max, actual| ValueObjectError::RoomIdTooLong { max, actual },
        )?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author display name.
///
/// Not globally unique; two connections may use the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author(String);

impl Author {
    /// Create a new Author.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        check_len(
            &name,
            MAX_AUTHOR_LEN,
            ValueObjectError::AuthorEmpty,
            |max, actual| ValueObjectError::AuthorTooLong { max, actual },
        )?;
        Ok(Self(name))
    }

    /// Author used for messages sent without a display name.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_AUTHOR.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message body value object.
///
/// Represents the text of a chat message with validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    /// Create a new MessageBody.
    ///
    /// # Arguments
    ///
    /// * `body` - The message text
    ///
    /// # Returns
    ///
    /// A Result containing the MessageBody or an error if validation fails
    pub fn new(body: String) -> Result<Self, ValueObjectError> {
        check_len(
            &body,
            MAX_MESSAGE_BODY_LEN,
            ValueObjectError::MessageBodyEmpty,
            |max, actual| ValueObjectError::MessageBodyTooLong { max, actual },
        )?;
        Ok(Self(body))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-formatted send time (e.g. `"10:00"`), stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTime(String);

impl DisplayTime {
    /// Create a new DisplayTime.
    pub fn new(time: String) -> Result<Self, ValueObjectError> {
        check_len(
            &time,
            MAX_DISPLAY_TIME_LEN,
            ValueObjectError::DisplayTimeEmpty,
            |max, actual| ValueObjectError::DisplayTimeTooLong { max, actual },
        )?;
        Ok(Self(time))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
