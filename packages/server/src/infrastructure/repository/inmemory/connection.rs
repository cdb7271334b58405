//! InMemory Connection Repository 実装
//!
//! 接続中のクライアントと送信キュー（Outbox）を HashMap で管理します。
//! ロックは同期ロックで、`.await` をまたいで保持しません。

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, DeliveryError, Outbox, RepositoryError, RoomId,
    Timestamp,
};

/// 接続情報と送信キューの組
struct ConnectionEntry {
    connection: Connection,
    outbox: Outbox,
}

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn update<T>(
        &self,
        id: &ConnectionId,
        f: impl FnOnce(&mut Connection) -> T,
    ) -> Result<T, RepositoryError> {
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        connections
            .get_mut(id)
            .map(|entry| f(&mut entry.connection))
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }
}

impl ConnectionRepository for InMemoryConnectionRepository {
    fn register(&self, id: ConnectionId, outbox: Outbox, connected_at: Timestamp) {
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        connections.insert(
            id.clone(),
            ConnectionEntry {
                connection: Connection::new(id, connected_at),
                outbox,
            },
        );
    }

    fn get(&self, id: &ConnectionId) -> Result<Connection, RepositoryError> {
        let connections = self
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        connections
            .get(id)
            .map(|entry| entry.connection.clone())
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }

    fn bind_to_room(
        &self,
        id: &ConnectionId,
        room: Option<RoomId>,
    ) -> Result<Option<RoomId>, RepositoryError> {
        self.update(id, |connection| std::mem::replace(&mut connection.room, room))
    }

    fn set_typing(
        &self,
        id: &ConnectionId,
        room: Option<RoomId>,
    ) -> Result<Option<RoomId>, RepositoryError> {
        self.update(id, |connection| {
            std::mem::replace(&mut connection.typing_in, room)
        })
    }

    fn unregister(&self, id: &ConnectionId) -> Result<Connection, RepositoryError> {
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        connections
            .remove(id)
            .map(|entry| entry.connection)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }

    fn deliver(&self, id: &ConnectionId, payload: &str) -> Result<(), DeliveryError> {
        let connections = self
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = connections
            .get(id)
            .ok_or_else(|| DeliveryError::ConnectionNotFound(id.to_string()))?;
        entry
            .outbox
            .try_send(payload.to_string())
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::QueueFull(id.to_string()),
                TrySendError::Closed(_) => DeliveryError::QueueClosed(id.to_string()),
            })
    }

    fn count(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
