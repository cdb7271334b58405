//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - ルームからの退出と、上がったままの入力中フラグの解除
//!
//! ### なぜこのテストが必要か
//! - 退出後の接続にはルームのメッセージが届かないことを保証
//! - 入力中のまま退出しても他のメンバーの表示が残らないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中のルームから退出
//! - エッジケース：どのルームにも参加していない
//! - 異常系：未登録の接続

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, RoomId, RoomRepository};

use super::{error::LeaveRoomError, set_typing::broadcast_typing};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { rooms, connections }
    }

    /// 現在のルームから退出する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RoomId))` - 退出したルーム
    /// * `Ok(None)` - どのルームにも参加していなかった
    /// * `Err(LeaveRoomError)` - 未登録の接続
    pub async fn execute(&self, id: &ConnectionId) -> Result<Option<RoomId>, LeaveRoomError> {
        let connection = self.connections.get(id)?;

        // Room Store から先に外す。途中で中断されても切断処理で再度 leave される
        if let Some(room) = &connection.room {
            self.rooms.leave(room, id).await;
        }
        self.connections.bind_to_room(id, None)?;

        if let Some(typing_room) = self.connections.set_typing(id, None)? {
            if let Err(e) = broadcast_typing(
                self.rooms.as_ref(),
                self.connections.as_ref(),
                &typing_room,
                id,
                false,
            )
            .await
            {
                tracing::warn!("Failed to clear typing state of '{}': {}", id, e);
            }
        }

        if let Some(room) = &connection.room {
            tracing::info!("Connection '{}' left room '{}'", id, room);
        }
        Ok(connection.room)
    }
}
