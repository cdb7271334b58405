//! Core domain models for the chat application.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    value_object::{Author, ConnectionId, DisplayTime, MessageBody, RoomId, Timestamp},
};

/// Represents a chat room with members and message history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Connections currently joined to the room
    pub members: BTreeSet<ConnectionId>,
    /// Message history in append order
    pub messages: VecDeque<ChatMessage>,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Maximum number of messages kept; the oldest is evicted beyond this.
    /// `None` keeps the full history.
    pub history_limit: Option<usize>,
}

impl Room {
    /// Create a new empty room with an unbounded history
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_history_limit(id, created_at, None)
    }

    /// Create a new empty room, optionally capping its history (at least 1)
    pub fn with_history_limit(
        id: RoomId,
        created_at: Timestamp,
        history_limit: Option<usize>,
    ) -> Self {
        Self {
            id,
            members: BTreeSet::new(),
            messages: VecDeque::new(),
            created_at,
            history_limit: history_limit.map(|limit| limit.max(1)),
        }
    }

    /// Add a member. Returns `false` if it was already a member.
    pub fn join(&mut self, member: ConnectionId) -> bool {
        self.members.insert(member)
    }

    /// Remove a member. Returns `false` if it was not a member.
    pub fn leave(&mut self, member: &ConnectionId) -> bool {
        self.members.remove(member)
    }

    /// Append a message to the end of the history
    ///
    /// Returns the evicted oldest message when the history limit is reached.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::RoomMismatch` if the message belongs to another room
    pub fn append(&mut self, message: ChatMessage) -> Result<Option<ChatMessage>, RoomError> {
        if message.room != self.id {
            return Err(RoomError::RoomMismatch {
                room: self.id.to_string(),
                message_room: message.room.to_string(),
            });
        }
        let evicted = if self
            .history_limit
            .is_some_and(|limit| self.messages.len() >= limit)
        {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        Ok(evicted)
    }

    /// Snapshot of the history in append order
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Members other than `exclude`, in a stable order
    pub fn members_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|member| *member != exclude)
            .cloned()
            .collect()
    }

    /// A room with neither members nor history can be dropped
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.messages.is_empty()
    }
}

/// Represents a chat message in the domain model
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Room the message was sent to
    pub room: RoomId,
    /// Display name of the sender
    pub author: Author,
    /// Message text
    pub body: MessageBody,
    /// Display-formatted send time
    pub time: DisplayTime,
    /// Server-side receive timestamp
    pub received_at: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        room: RoomId,
        author: Author,
        body: MessageBody,
        time: DisplayTime,
        received_at: Timestamp,
    ) -> Self {
        Self {
            room,
            author,
            body,
            time,
            received_at,
        }
    }
}

/// Snapshot of a live connection held by the connection registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Room the connection is joined to, if any
    pub room: Option<RoomId>,
    /// Room in which the connection's typing flag is raised, if any
    pub typing_in: Option<RoomId>,
    /// Timestamp when the connection was registered
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a freshly connected, room-less connection
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            room: None,
            typing_in: None,
            connected_at,
        }
    }
}
