//! UseCase: メッセージ送信処理（Message Router）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（入力検証、履歴への追加、送信者以外へのファンアウト）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：送信者以外にメッセージがブロードキャストされる
//! - 不正な入力では履歴にもブロードキャストにも副作用がないことを保証
//! - 一部の受信者への配送失敗が他の受信者に影響しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：空の本文・空のルーム ID、未登録の送信者
//! - エッジケース：送信者のみが参加している場合（ブロードキャスト対象なし）

use std::sync::Arc;

use agora_shared::time::{display_time_now, now_millis};

use crate::{
    domain::{
        Author, ChatMessage, ConnectionId, ConnectionRepository, DisplayTime, MessageBody, RoomId,
        RoomRepository, Timestamp,
    },
    infrastructure::dto::{MessageDto, websocket::ServerEvent},
};

use super::{
    error::SendMessageError,
    fan_out::{FanOutReport, fan_out},
};

/// 送信要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    /// 送信先ルーム ID
    pub room: String,
    /// 表示名（省略時は "Anonymous"）
    pub author: Option<String>,
    /// 本文
    pub body: String,
    /// 表示用時刻（省略時はサーバーの現在時刻）
    pub time: Option<String>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { rooms, connections }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元の接続
    /// * `command` - 送信要求
    ///
    /// # Returns
    ///
    /// * `Ok(FanOutReport)` - 送信者以外のメンバーへの配送結果
    /// * `Err(SendMessageError)` - 送信失敗（履歴・配送ともに副作用なし）
    pub async fn execute(
        &self,
        from: &ConnectionId,
        command: SendMessageCommand,
    ) -> Result<FanOutReport, SendMessageError> {
        // 1. 入力検証（副作用の前に全て済ませる）
        let message = build_message(command)?;
        self.connections.get(from)?;

        let payload = ServerEvent::ReceiveMessage(MessageDto::from(&message))
            .to_json()
            .map_err(|e| SendMessageError::Encode(e.to_string()))?;

        // 2. 履歴に追加し、ルームのロック中に送信者以外へ配送する
        let connections = self.connections.as_ref();
        let mut report = FanOutReport::default();
        self.rooms
            .append_message(message, &mut |room, _| {
                report = fan_out(connections, &room.members_except(from), &payload);
            })
            .await?;

        tracing::debug!(
            "Message from '{}' fanned out to {} member(s), {} failure(s)",
            from,
            report.delivered,
            report.failed.len()
        );
        Ok(report)
    }
}

fn build_message(command: SendMessageCommand) -> Result<ChatMessage, SendMessageError> {
    let room = RoomId::new(command.room)?;
    let body = MessageBody::new(command.body)?;
    let author = match command.author {
        Some(name) if !name.trim().is_empty() => Author::new(name)?,
        _ => Author::anonymous(),
    };
    let time = match command.time {
        Some(time) if !time.is_empty() => DisplayTime::new(time)?,
        _ => DisplayTime::new(display_time_now())?,
    };
    Ok(ChatMessage::new(
        room,
        author,
        body,
        time,
        Timestamp::new(now_millis()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DeliveryError, MockConnectionRepository, ValueObjectError},
        infrastructure::repository::InMemoryRoomRepository,
        usecase::testing::{Fixture, connection_id, drain, room_id},
    };

    fn usecase(fixture: &Fixture) -> SendMessageUseCase {
        SendMessageUseCase::new(fixture.rooms.clone(), fixture.connections.clone())
    }

    fn command(room: &str, author: &str, body: &str, time: &str) -> SendMessageCommand {
        SendMessageCommand {
            room: room.to_string(),
            author: Some(author.to_string()),
            body: body.to_string(),
            time: Some(time.to_string()),
        }
    }

    fn received(author: &str, message: &str, time: &str) -> ServerEvent {
        ServerEvent::ReceiveMessage(MessageDto {
            author: author.to_string(),
            message: message.to_string(),
            time: time.to_string(),
        })
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: 送信者以外のメンバーに届き、送信者にはエコーされない
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, mut rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "123").await;

        // when (操作): A が送信
        let report = usecase(&fixture)
            .execute(&a, command("123", "A", "hi", "10:00"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert!(report.failed.is_empty());
        assert_eq!(drain(&mut rx_b), vec![received("A", "hi", "10:00")]);
        assert!(drain(&mut rx_a).is_empty());

        let history = fixture.rooms.get_history(&room_id("123")).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].author.as_str(), "A");
        assert_eq!(history[0].body.as_str(), "hi");
        assert_eq!(history[0].time.as_str(), "10:00");
    }

    #[tokio::test]
    async fn test_send_message_only_to_same_room() {
        // テスト項目: 別のルームのメンバーには届かない
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "1").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "2").await;

        // when (操作):
        usecase(&fixture)
            .execute(&a, command("1", "A", "hi", "10:00"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn test_send_message_no_broadcast_targets() {
        // テスト項目: 送信者のみが参加している場合、ブロードキャスト対象は空
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;

        // when (操作):
        let report = usecase(&fixture)
            .execute(&a, command("123", "A", "hi", "10:00"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report, FanOutReport::default());
        assert_eq!(fixture.rooms.get_history(&room_id("123")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_fills_defaults() {
        // テスト項目: author と time を省略すると既定値が補われる
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let command = SendMessageCommand {
            room: "123".to_string(),
            author: None,
            body: "hi".to_string(),
            time: None,
        };

        // when (操作):
        usecase(&fixture).execute(&a, command).await.unwrap();

        // then (期待する結果):
        let history = fixture.rooms.get_history(&room_id("123")).await;
        assert_eq!(history[0].author.as_str(), "Anonymous");
        assert_eq!(history[0].time.as_str().len(), 8); // HH:MM:SS
    }

    #[tokio::test]
    async fn test_send_message_empty_body_has_no_side_effect() {
        // テスト項目: 空の本文は InvalidArgument で、履歴にもブロードキャストにも影響しない
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "123").await;

        // when (操作):
        let result = usecase(&fixture)
            .execute(&a, command("123", "A", "", "10:00"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::InvalidArgument(
                ValueObjectError::MessageBodyEmpty
            ))
        );
        assert!(fixture.rooms.get_history(&room_id("123")).await.is_empty());
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn test_send_message_empty_room_touches_nothing() {
        // テスト項目: 空のルーム ID は Connection Registry に触れる前に拒否される
        // given (前提条件):
        let rooms = Arc::new(InMemoryRoomRepository::default());
        let mut connections = MockConnectionRepository::new();
        connections.expect_get().times(0);
        connections.expect_deliver().times(0);
        let usecase = SendMessageUseCase::new(rooms.clone(), Arc::new(connections));

        // when (操作):
        let result = usecase
            .execute(&connection_id("a"), command("", "A", "hi", "10:00"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::InvalidArgument(ValueObjectError::RoomIdEmpty))
        );
        assert!(rooms.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_from_unknown_connection_fails() {
        // テスト項目: 未登録の送信者は NotFound で、履歴に追加されない
        // given (前提条件):
        let fixture = Fixture::new();

        // when (操作):
        let result = usecase(&fixture)
            .execute(&connection_id("ghost"), command("123", "A", "hi", "10:00"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::NotFound("ghost".to_string())));
        assert!(fixture.rooms.get_history(&room_id("123")).await.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_survives_dead_member() {
        // テスト項目: 切断済みのメンバーがいても他のメンバーには届く
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, rx_b) = fixture.connect_to_room("b", "123").await;
        let (_c, mut rx_c) = fixture.connect_to_room("c", "123").await;
        drop(rx_b); // b の書き込みタスクが終了した状態

        // when (操作):
        let report = usecase(&fixture)
            .execute(&a, command("123", "A", "hi", "10:00"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(
            report.failed,
            vec![DeliveryError::QueueClosed("b".to_string())]
        );
        assert_eq!(drain(&mut rx_c), vec![received("A", "hi", "10:00")]);
    }

    #[tokio::test]
    async fn test_send_message_preserves_sender_order() {
        // テスト項目: 同じ送信者のメッセージは送信順に履歴・受信者に届く
        // given (前提条件):
        let fixture = Fixture::new();
        let (a, _rx_a) = fixture.connect_to_room("a", "123").await;
        let (_b, mut rx_b) = fixture.connect_to_room("b", "123").await;
        let send = usecase(&fixture);

        // when (操作):
        for body in ["1", "2", "3"] {
            send.execute(&a, command("123", "A", body, "10:00"))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let bodies: Vec<_> = fixture
            .rooms
            .get_history(&room_id("123"))
            .await
            .into_iter()
            .map(|m| m.body.as_str().to_string())
            .collect();
        assert_eq!(bodies, vec!["1", "2", "3"]);
        assert_eq!(
            drain(&mut rx_b),
            vec![
                received("A", "1", "10:00"),
                received("A", "2", "10:00"),
                received("A", "3", "10:00"),
            ]
        );
    }
}
