//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod fan_out;
pub mod get_history;
pub mod join_room;
pub mod leave_room;
pub mod send_message;
pub mod set_typing;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ConnectError, DisconnectError, JoinRoomError, LeaveRoomError, SendMessageError, TypingError,
};
pub use fan_out::FanOutReport;
pub use get_history::GetHistoryUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::LeaveRoomUseCase;
pub use send_message::{SendMessageCommand, SendMessageUseCase};
pub use set_typing::SetTypingUseCase;
