//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロック順序
//!
//! ルームへのアクセスは必ず「ルーム表 (RwLock) → 各ルーム (Mutex)」の順で
//! ロックを取得し、ルームを操作している間はルーム表のガードも保持します。
//! 空になったルームの削除はルーム表の書き込みロックを必要とするため、
//! 操作中のルームが削除されることはありません。

use std::{collections::HashMap, sync::Arc};

use agora_shared::time::now_millis;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    AppendHook, ChatMessage, ConnectionId, Room, RoomError, RoomId,
    RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    /// ルーム ID → Room ドメインモデル
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<Room>>>>,
    /// 新規ルームに設定する履歴上限（None なら無制限）
    history_limit: Option<usize>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            history_limit,
        }
    }

    fn new_room(&self, room_id: &RoomId) -> Arc<Mutex<Room>> {
        Arc::new(Mutex::new(Room::with_history_limit(
            room_id.clone(),
            Timestamp::new(now_millis()),
            self.history_limit,
        )))
    }

    /// 空になったルームをルーム表から削除する
    async fn remove_if_empty(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get(room_id).cloned() else {
            return;
        };
        if room.lock().await.is_empty() {
            rooms.remove(room_id);
            tracing::debug!("Room '{}' is empty and has been dropped", room_id);
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(&self, room_id: &RoomId, member: &ConnectionId) -> bool {
        {
            let rooms = self.rooms.read().await;
            if let Some(room) = rooms.get(room_id) {
                return room.lock().await.join(member.clone());
            }
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::debug!("Room '{}' created", room_id);
                self.new_room(room_id)
            })
            .clone();
        room.lock().await.join(member.clone())
    }

    async fn leave(&self, room_id: &RoomId, member: &ConnectionId) -> bool {
        let (left, now_empty) = {
            let rooms = self.rooms.read().await;
            let Some(room) = rooms.get(room_id) else {
                return false;
            };
            let mut room = room.lock().await;
            let left = room.leave(member);
            (left, room.is_empty())
        };

        if now_empty {
            self.remove_if_empty(room_id).await;
        }
        left
    }

    async fn append_message(
        &self,
        message: ChatMessage,
        on_append: AppendHook<'_>,
    ) -> Result<(), RoomError> {
        let room_id = message.room.clone();
        {
            let rooms = self.rooms.read().await;
            if let Some(room) = rooms.get(&room_id) {
                let mut room = room.lock().await;
                return append_locked(&mut room, message, on_append);
            }
        }

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| self.new_room(&room_id))
            .clone();
        let mut room = room.lock().await;
        append_locked(&mut room, message, on_append)
    }

    async fn get_history(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        let rooms = self.rooms.read().await;
        match rooms.get(room_id) {
            Some(room) => room.lock().await.history(),
            None => Vec::new(),
        }
    }

    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let rooms = self.rooms.read().await;
        match rooms.get(room_id) {
            Some(room) => room.lock().await.members.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.read().await;
        match rooms.get(room_id) {
            Some(room) => Some(room.lock().await.clone()),
            None => None,
        }
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.read().await;
        let mut snapshots = Vec::with_capacity(rooms.len());
        for room in rooms.values() {
            snapshots.push(room.lock().await.clone());
        }
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }
}

fn append_locked(
    room: &mut Room,
    message: ChatMessage,
    on_append: AppendHook<'_>,
) -> Result<(), RoomError> {
    if let Some(evicted) = room.append(message)? {
        tracing::debug!(
            "History limit of room '{}' reached; evicted message from '{}'",
            room.id,
            evicted.author
        );
    }
    if let Some(appended) = room.messages.back() {
        on_append(&*room, appended);
    }
    Ok(())
}
