//! Repository traits.
//!
//! The domain layer defines these abstractions; the infrastructure layer
//! provides implementations (dependency inversion).

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::{ChatMessage, Connection, Room},
    error::{DeliveryError, RepositoryError, RoomError},
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// Bounded outbound queue of a connection. Frames are serialized JSON.
pub type Outbox = mpsc::Sender<String>;

/// Called with the room and the freshly appended message while the room is
/// still locked. Must not block.
pub type AppendHook<'a> = &'a mut (dyn FnMut(&Room, &ChatMessage) + Send);

/// Live connections, their outbound queues, room binding and typing flag.
///
/// Methods are synchronous: implementations must only hold their locks for
/// short, non-awaiting sections so they can be called from an [`AppendHook`].
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionRepository: Send + Sync {
    /// Record a new connection with no room.
    fn register(&self, id: ConnectionId, outbox: Outbox, connected_at: Timestamp);

    /// Snapshot of a connection.
    fn get(&self, id: &ConnectionId) -> Result<Connection, RepositoryError>;

    /// Bind the connection to `room` (or unbind with `None`), returning the previous room.
    fn bind_to_room(
        &self,
        id: &ConnectionId,
        room: Option<RoomId>,
    ) -> Result<Option<RoomId>, RepositoryError>;

    /// Raise (`Some(room)`) or lower (`None`) the typing flag, returning the previous value.
    fn set_typing(
        &self,
        id: &ConnectionId,
        room: Option<RoomId>,
    ) -> Result<Option<RoomId>, RepositoryError>;

    /// Remove the connection and its typing state, returning its last snapshot.
    fn unregister(&self, id: &ConnectionId) -> Result<Connection, RepositoryError>;

    /// Push a frame into the connection's outbound queue without waiting.
    fn deliver(&self, id: &ConnectionId, payload: &str) -> Result<(), DeliveryError>;

    /// Number of registered connections.
    fn count(&self) -> usize;
}

/// Rooms, their membership and message history.
///
/// Mutations of one room are serialized; different rooms proceed in parallel.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Add `member` to the room, creating it if absent.
    ///
    /// Returns `false` if the connection was already a member.
    async fn join(&self, room_id: &RoomId, member: &ConnectionId) -> bool;

    /// Remove `member` from the room; drops the room once it has neither
    /// members nor history. Returns `false` if it was not a member.
    async fn leave(&self, room_id: &RoomId, member: &ConnectionId) -> bool;

    /// Append `message` to its room (created if absent) and run `on_append`
    /// before the room is unlocked, so observers see messages in append order.
    async fn append_message(
        &self,
        message: ChatMessage,
        on_append: AppendHook<'_>,
    ) -> Result<(), RoomError>;

    /// Stored history in append order; empty for an unknown room.
    async fn get_history(&self, room_id: &RoomId) -> Vec<ChatMessage>;

    /// Current members in a stable order; empty for an unknown room.
    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Snapshot of a room.
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// Snapshots of all rooms, sorted by ID.
    async fn list_rooms(&self) -> Vec<Room>;
}
