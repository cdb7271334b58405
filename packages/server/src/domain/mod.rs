//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Room};
pub use error::{DeliveryError, RepositoryError, RoomError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{AppendHook, ConnectionRepository, Outbox, RoomRepository};
#[cfg(test)]
pub use repository::MockConnectionRepository;
pub use value_object::{Author, ConnectionId, DisplayTime, MessageBody, RoomId, Timestamp};
