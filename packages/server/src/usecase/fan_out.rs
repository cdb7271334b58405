//! 複数の接続へのイベント配送（ファンアウト）
//!
//! 配送は接続ごとに独立しており、ある受信者への失敗は
//! ログに記録して数えるだけで、他の受信者への配送を妨げません。

use crate::domain::{ConnectionId, ConnectionRepository, DeliveryError};

/// ファンアウトの結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    /// 送信キューに積めた受信者数
    pub delivered: usize,
    /// 受信者ごとの配送失敗
    pub failed: Vec<DeliveryError>,
}

/// `targets` の各接続に `payload` を配送する
pub(crate) fn fan_out<'a>(
    connections: &dyn ConnectionRepository,
    targets: impl IntoIterator<Item = &'a ConnectionId>,
    payload: &str,
) -> FanOutReport {
    let mut report = FanOutReport::default();
    for target in targets {
        match connections.deliver(target, payload) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::warn!("Delivery to '{}' failed: {}", target, e);
                report.failed.push(e);
            }
        }
    }
    report
}
