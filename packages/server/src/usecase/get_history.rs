//! UseCase: 履歴取得（History Service）

use std::sync::Arc;

use crate::domain::{ChatMessage, RoomId, RoomRepository};

/// 履歴取得のユースケース
pub struct GetHistoryUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetHistoryUseCase {
    /// 新しい GetHistoryUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// ルームの履歴を追加順で返す
    ///
    /// 未知のルームや不正なルーム ID に対してはエラーではなく空の履歴を返す。
    pub async fn execute(&self, room: String) -> Vec<ChatMessage> {
        match RoomId::new(room) {
            Ok(room_id) => self.rooms.get_history(&room_id).await,
            Err(e) => {
                tracing::debug!("History requested for invalid room id: {}", e);
                Vec::new()
            }
        }
    }
}
