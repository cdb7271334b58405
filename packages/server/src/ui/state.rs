//! Shared server state.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::{ConnectionRepository, RoomRepository},
    infrastructure::repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
};

/// Shared application state
pub struct AppState {
    /// Room Store（データアクセス層の抽象化）
    pub rooms: Arc<dyn RoomRepository>,
    /// Connection Registry
    pub connections: Arc<dyn ConnectionRepository>,
    /// Capacity of each connection's outbound queue
    pub outbox_capacity: usize,
}

impl AppState {
    /// In-memory state built from the configuration
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_repositories(
            Arc::new(InMemoryRoomRepository::new(config.history_limit)),
            Arc::new(InMemoryConnectionRepository::new()),
            config.outbox_capacity,
        )
    }

    pub fn with_repositories(
        rooms: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
        outbox_capacity: usize,
    ) -> Self {
        Self {
            rooms,
            connections,
            outbox_capacity: outbox_capacity.max(1),
        }
    }
}
