//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加は排他的：別のルームに参加すると元のルームからは退出する
//! - 入力中のメンバーがいるルームに参加すると display_typing(true) を受け取る
//!
//! ### なぜこのテストが必要か
//! - 同じルームへの再参加が冪等であることを保証
//! - 「置き換え」と「追加」のセマンティクスが混在しないことを確認
//! - 参加はメッセージ履歴を変更しない
//! - 入力の途中で参加したメンバーにも入力中表示が出ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、別ルームへの移動
//! - 異常系：空のルーム ID、未登録の接続
//! - エッジケース：同じルームへの再参加

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, RoomId, RoomRepository},
    infrastructure::dto::websocket::ServerEvent,
};

use super::{error::JoinRoomError, leave_room::LeaveRoomUseCase};

/// ルーム参加の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 参加したルーム
    pub room: RoomId,
    /// 参加に伴って退出したルーム
    pub previous: Option<RoomId>,
    /// すでに同じルームに参加していた場合は false
    pub newly_joined: bool,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { rooms, connections }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 参加する接続
    /// * `room` - 参加先のルーム ID（存在しなければ作成される）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加結果
    /// * `Err(JoinRoomError)` - ルーム ID 不正・未登録の接続
    pub async fn execute(&self, id: &ConnectionId, room: String) -> Result<JoinOutcome, JoinRoomError> {
        let room_id = RoomId::new(room)?;
        let connection = self.connections.get(id)?;

        if connection.room.as_ref() == Some(&room_id) {
            let newly_joined = self.rooms.join(&room_id, id).await;
            return Ok(JoinOutcome {
                room: room_id,
                previous: None,
                newly_joined,
            });
        }

        let previous = LeaveRoomUseCase::new(self.rooms.clone(), self.connections.clone())
            .execute(id)
            .await?;

        // Registry を先に更新する。途中で中断されても切断処理が Room Store から外す
        self.connections.bind_to_room(id, Some(room_id.clone()))?;
        self.rooms.join(&room_id, id).await;
        self.replay_typing(&room_id, id).await;

        tracing::info!("Connection '{}' joined room '{}'", id, room_id);
        Ok(JoinOutcome {
            room: room_id,
            previous,
            newly_joined: true,
        })
    }

    /// 入力中のメンバーがいれば、参加した接続に display_typing(true) を送る
    async fn replay_typing(&self, room_id: &RoomId, joiner: &ConnectionId) {
        let someone_typing = self
            .rooms
            .members(room_id)
            .await
            .iter()
            .filter(|member| *member != joiner)
            .any(|member| {
                self.connections
                    .get(member)
                    .is_ok_and(|connection| connection.typing_in.as_ref() == Some(room_id))
            });
        if !someone_typing {
            return;
        }

        let payload = match ServerEvent::DisplayTyping(true).to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to encode typing event: {}", e);
                return;
            }
        };
        if let Err(e) = self.connections.deliver(joiner, &payload) {
            tracing::warn!("Failed to replay typing state to '{}': {}", joiner, e);
        }
    }
}
