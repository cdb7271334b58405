//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError, ValueObjectError};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// 接続 ID を生成できなかった
    #[error("Failed to generate connection id: {0}")]
    IdGeneration(#[from] ValueObjectError),
}

/// ルーム参加のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    /// ルーム ID が不正
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValueObjectError),

    /// 接続が登録されていない
    #[error("Connection '{0}' not found")]
    NotFound(String),
}

/// ルーム退出のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaveRoomError {
    /// 接続が登録されていない
    #[error("Connection '{0}' not found")]
    NotFound(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// ルーム ID・本文などが不正（副作用なし）
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValueObjectError),

    /// 送信元の接続が登録されていない
    #[error("Connection '{0}' not found")]
    NotFound(String),

    /// ルームが追加を拒否した
    #[error("Message rejected: {0}")]
    Rejected(#[from] RoomError),

    /// イベントのシリアライズに失敗した
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// 入力中状態のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypingError {
    /// ルーム ID が不正
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValueObjectError),

    /// 接続が登録されていない
    #[error("Connection '{0}' not found")]
    NotFound(String),

    /// イベントのシリアライズに失敗した
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// 切断処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    /// 接続が登録されていない
    #[error("Connection '{0}' not found")]
    NotFound(String),
}

macro_rules! not_found_from_repository {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<RepositoryError> for $error {
                fn from(error: RepositoryError) -> Self {
                    match error {
                        RepositoryError::ConnectionNotFound(id) => Self::NotFound(id),
                    }
                }
            }
        )*
    };
}

not_found_from_repository!(
    JoinRoomError,
    LeaveRoomError,
    SendMessageError,
    TypingError,
    DisconnectError,
);

impl From<LeaveRoomError> for JoinRoomError {
    fn from(error: LeaveRoomError) -> Self {
        match error {
            LeaveRoomError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<LeaveRoomError> for DisconnectError {
    fn from(error: LeaveRoomError) -> Self {
        match error {
            LeaveRoomError::NotFound(id) => Self::NotFound(id),
        }
    }
}
