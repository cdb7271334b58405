//! UseCase: 入力中状態の配信（Presence / Typing Broadcaster）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetTypingUseCase::execute() メソッド
//! - display_typing の配信対象（送信者以外のメンバー）
//!
//! ### なぜこのテストが必要か
//! - 入力中状態は送信者自身に返ってはならない
//! - 入力中状態は履歴に保存されない
//! - 重複した true/false もそのまま配信される（受信側で冪等に扱う）
//!
//! ### どのような状況を想定しているか
//! - 正常系：true → false の遷移
//! - 異常系：空のルーム ID、未登録の接続
//! - エッジケース：別のルームで入力中だった場合

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, RoomId, RoomRepository},
    infrastructure::dto::websocket::ServerEvent,
};

use super::{
    error::TypingError,
    fan_out::{FanOutReport, fan_out},
};

/// 入力中状態配信のユースケース
pub struct SetTypingUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl SetTypingUseCase {
    /// 新しい SetTypingUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { rooms, connections }
    }

    /// 入力中状態を更新し、ルームの他のメンバーに配信する
    ///
    /// # Arguments
    ///
    /// * `from` - 入力中の接続
    /// * `room` - 対象ルーム ID
    /// * `active` - 入力中かどうか
    ///
    /// # Returns
    ///
    /// * `Ok(FanOutReport)` - 配信結果
    /// * `Err(TypingError)` - ルーム ID 不正・未登録の接続
    pub async fn execute(
        &self,
        from: &ConnectionId,
        room: String,
        active: bool,
    ) -> Result<FanOutReport, TypingError> {
        let room_id = RoomId::new(room)?;

        let previous = self
            .connections
            .set_typing(from, active.then(|| room_id.clone()))?;

        // 別のルームで上げたままのフラグはそちらで下ろす
        if let Some(stale) = previous.filter(|previous| *previous != room_id) {
            broadcast_typing(self.rooms.as_ref(), self.connections.as_ref(), &stale, from, false)
                .await?;
        }

        broadcast_typing(
            self.rooms.as_ref(),
            self.connections.as_ref(),
            &room_id,
            from,
            active,
        )
        .await
    }
}

/// `display_typing(active)` を `from` 以外のメンバーに配信する
pub(crate) async fn broadcast_typing(
    rooms: &dyn RoomRepository,
    connections: &dyn ConnectionRepository,
    room_id: &RoomId,
    from: &ConnectionId,
    active: bool,
) -> Result<FanOutReport, TypingError> {
    let payload = ServerEvent::DisplayTyping(active)
        .to_json()
        .map_err(|e| TypingError::Encode(e.to_string()))?;
    let members = rooms.members(room_id).await;
    let targets = members.iter().filter(|member| *member != from);
    Ok(fan_out(connections, targets, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueObjectError;
    use crate::usecase::testing::{Fixture, connection_id, drain, room_id};

    fn usecase(fixture: &Fixture) -> SetTypingUseCase {
        SetTypingUseCase::new(fixture.rooms.clone(), fixture.connections.clone())
    }

    #[tokio::test]
    async fn test_typing_is_broadcast_to_others_only() {
        // テスト項目: 入力中状態は送信者以外にだけ配信される
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, mut rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "123").await;
        let (_c, mut rx_c) = fixture.connect_to_room("c", "123").await;

        // when (操作):
        let report = usecase(&fixture)
            .execute(&a, "123".to_string(), true)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(drain(&mut rx_b), vec![ServerEvent::DisplayTyping(true)]);
        assert_eq!(drain(&mut rx_c), vec![ServerEvent::DisplayTyping(true)]);
    }

    #[tokio::test]
    async fn test_typing_is_not_stored_in_history() {
        // テスト項目: 入力中状態は履歴に残らない
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;

        // when (操作):
        usecase(&fixture)
            .execute(&a, "123".to_string(), true)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(fixture.rooms.get_history(&room_id("123")).await.is_empty());
        assert_eq!(
            fixture.connections.get(&a).unwrap().typing_in,
            Some(room_id("123"))
        );
    }

    #[tokio::test]
    async fn test_duplicate_transitions_are_forwarded() {
        // テスト項目: 重複した true もそのまま配信される（レベルトリガー）
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "123").await;
        let typing = usecase(&fixture);

        // when (操作):
        typing.execute(&a, "123".to_string(), true).await.unwrap();
        typing.execute(&a, "123".to_string(), true).await.unwrap();
        typing.execute(&a, "123".to_string(), false).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            drain(&mut rx_b),
            vec![
                ServerEvent::DisplayTyping(true),
                ServerEvent::DisplayTyping(true),
                ServerEvent::DisplayTyping(false),
            ]
        );
        assert_eq!(fixture.connections.get(&a).unwrap().typing_in, None);
    }

    #[tokio::test]
    async fn test_typing_in_new_room_lowers_stale_flag() {
        // テスト項目: 別のルームで入力中だった場合、そちらには false が送られる
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "1").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "1").await;
        let (_c, mut rx_c) = fixture.connect_to_room("c", "2").await;
        let typing = usecase(&fixture);
        typing.execute(&a, "1".to_string(), true).await.unwrap();
        drain(&mut rx_b);

        // when (操作):
        typing.execute(&a, "2".to_string(), true).await.unwrap();

        // then (期待する結果):
        assert_eq!(drain(&mut rx_b), vec![ServerEvent::DisplayTyping(false)]);
        assert_eq!(drain(&mut rx_c), vec![ServerEvent::DisplayTyping(true)]);
    }

    #[tokio::test]
    async fn test_typing_with_empty_room_is_rejected() {
        // テスト項目: 空のルーム ID は InvalidArgument
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;

        // when (操作):
        let result = usecase(&fixture).execute(&a, String::new(), true).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(TypingError::InvalidArgument(ValueObjectError::RoomIdEmpty))
        );
        assert_eq!(fixture.connections.get(&a).unwrap().typing_in, None);
    }

    #[tokio::test]
    async fn test_typing_from_unknown_connection_fails() {
        // テスト項目: 未登録の接続からの入力中状態は NotFound
        // given (前提条件):
        let fixture = Fixture::new();

        // when (操作):
        let result = usecase(&fixture)
            .execute(&connection_id("ghost"), "123".to_string(), true)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(TypingError::NotFound("ghost".to_string())));
    }
}
