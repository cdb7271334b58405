//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時のルーム退出、入力中フラグの解除、Connection Registry からの削除
//!
//! ### なぜこのテストが必要か
//! - 切断した接続がルームのメンバーに残らないことを保証
//! - 入力中のまま切断しても他のメンバーの表示が残らないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム参加中の切断
//! - エッジケース：ルーム未参加での切断
//! - 異常系：存在しない接続の切断試行

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, RoomId, RoomRepository};

use super::{error::DisconnectError, leave_room::LeaveRoomUseCase};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { rooms, connections }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Option<RoomId>)` - 切断時に参加していたルーム
    /// * `Err(DisconnectError)` - 未登録の接続
    pub async fn execute(&self, id: &ConnectionId) -> Result<Option<RoomId>, DisconnectError> {
        // 1. ルームから退出（入力中フラグも下ろす）
        let left = LeaveRoomUseCase::new(self.rooms.clone(), self.connections.clone())
            .execute(id)
            .await?;

        // 2. Registry から削除
        self.connections.unregister(id)?;

        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::dto::websocket::ServerEvent;
    use crate::usecase::{
        SendMessageCommand, SendMessageUseCase, SetTypingUseCase,
        testing::{Fixture, connection_id, drain, room_id},
    };

    fn usecase(fixture: &Fixture) -> DisconnectParticipantUseCase {
        DisconnectParticipantUseCase::new(fixture.rooms.clone(), fixture.connections.clone())
    }

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 切断するとルームのメンバーと Registry の両方から削除される
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let (b, _rx_b) = fixture.connect_to_room("b", "123").await;
        let disconnect = usecase(&fixture);

        // when (操作):
        let result = disconnect.execute(&a).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some(room_id("123"))));
        assert_eq!(fixture.rooms.members(&room_id("123")).await, vec![b]);
        assert!(fixture.connections.get(&a).is_err());
        assert_eq!(fixture.connections.count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_without_room() {
        // テスト項目: ルーム未参加の接続も切断できる
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect("a");

        // when (操作):
        let result = usecase(&fixture).execute(&a).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert_eq!(fixture.connections.count(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_last_member_keeps_history() {
        // テスト項目: 最後のメンバーが切断しても履歴のあるルームは残る
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        SendMessageUseCase::new(fixture.rooms.clone(), fixture.connections.clone())
            .execute(
                &a,
                SendMessageCommand {
                    room: "123".to_string(),
                    author: Some("A".to_string()),
                    body: "hi".to_string(),
                    time: Some("10:00".to_string()),
                },
            )
            .await
            .unwrap();

        // when (操作):
        usecase(&fixture).execute(&a).await.unwrap();

        // then (期待する結果):
        assert_eq!(fixture.rooms.get_history(&room_id("123")).await.len(), 1);
        assert!(fixture.rooms.members(&room_id("123")).await.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_while_typing_lowers_flag() {
        // テスト項目: 入力中のまま切断すると残りのメンバーに false が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "123").await;
        SetTypingUseCase::new(fixture.rooms.clone(), fixture.connections.clone())
            .execute(&a, "123".to_string(), true)
            .await
            .unwrap();

        // when (操作):
        usecase(&fixture).execute(&a).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            drain(&mut rx_b),
            vec![
                ServerEvent::DisplayTyping(true),
                ServerEvent::DisplayTyping(false),
            ]
        );
    }

    #[tokio::test]
    async fn test_disconnect_nonexistent_participant() {
        // テスト項目: 存在しない接続の切断は NotFound
        let fixture = Fixture::new();
        let result = usecase(&fixture).execute(&connection_id("ghost")).await;
        assert_eq!(result, Err(DisconnectError::NotFound("ghost".to_string())));
    }
}
