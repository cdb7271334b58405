//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続 ID の払い出しと Connection Registry への登録
//!
//! ### なぜこのテストが必要か
//! - 接続直後はどのルームにも参加していないことを保証
//! - 接続ごとに一意な ID が払い出されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - エッジケース：同時に複数の接続

use std::sync::Arc;

use agora_shared::time::now_millis;

use crate::domain::{ConnectionId, ConnectionIdFactory, ConnectionRepository, Outbox, Timestamp};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Connection Registry（データアクセス層の抽象化）
    connections: Arc<dyn ConnectionRepository>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(connections: Arc<dyn ConnectionRepository>) -> Self {
        Self { connections }
    }

    /// 接続を実行
    ///
    /// # Arguments
    ///
    /// * `outbox` - この接続宛てのフレームを積む送信キュー
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 払い出された接続 ID
    /// * `Err(ConnectError)` - 接続失敗
    pub fn execute(&self, outbox: Outbox) -> Result<ConnectionId, ConnectError> {
        let id = ConnectionIdFactory::generate()?;
        self.connections
            .register(id.clone(), outbox, Timestamp::new(now_millis()));
        Ok(id)
    }
}
