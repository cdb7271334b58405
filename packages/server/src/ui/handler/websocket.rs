//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{ClientEvent, ErrorKind, ErrorPayload, ServerEvent},
    ui::state::AppState,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, JoinRoomError, JoinRoomUseCase,
        LeaveRoomError, LeaveRoomUseCase, SendMessageCommand, SendMessageError,
        SendMessageUseCase, SetTypingUseCase, TypingError,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Bounded per-connection queue; a full queue drops frames for this connection only
    let (tx, mut rx) = mpsc::channel::<String>(state.outbox_capacity);

    let connection_id = match ConnectParticipantUseCase::new(state.connections.clone()).execute(tx)
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' established", connection_id);

    let (mut sender, mut receiver) = socket.split();

    let recv_id = connection_id.clone();
    let recv_state = state.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_id, text.as_str());
                    handle_text(&recv_state, &recv_id, text.as_str()).await;
                }
                Message::Binary(_) => {
                    reply_error(
                        &recv_state,
                        &recv_id,
                        ErrorPayload::new(ErrorKind::BadRequest, "binary frames are not supported"),
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to drain the outbox into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match DisconnectParticipantUseCase::new(state.rooms.clone(), state.connections.clone())
        .execute(&connection_id)
        .await
    {
        Ok(room) => tracing::info!(
            "Connection '{}' closed (room: {})",
            connection_id,
            room.as_ref().map(|r| r.as_str()).unwrap_or("-")
        ),
        Err(e) => tracing::warn!("Failed to disconnect '{}': {}", connection_id, e),
    }
}

/// Parse one text frame and dispatch it to the matching use case
async fn handle_text(state: &AppState, id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed event from '{}': {}", id, e);
            reply_error(
                state,
                id,
                ErrorPayload::new(ErrorKind::BadRequest, format!("malformed event: {e}")),
            );
            return;
        }
    };

    let result = match event {
        ClientEvent::JoinRoom(room) => {
            JoinRoomUseCase::new(state.rooms.clone(), state.connections.clone())
                .execute(id, room)
                .await
                .map(|outcome| {
                    if let Some(previous) = outcome.previous {
                        tracing::debug!("'{}' moved from '{}' to '{}'", id, previous, outcome.room);
                    } else if !outcome.newly_joined {
                        tracing::debug!("'{}' is already in '{}'", id, outcome.room);
                    }
                })
                .map_err(join_error)
        }
        ClientEvent::LeaveRoom => {
            LeaveRoomUseCase::new(state.rooms.clone(), state.connections.clone())
                .execute(id)
                .await
                .map(|_| ())
                .map_err(leave_error)
        }
        ClientEvent::SendMessage(payload) => {
            let command = SendMessageCommand {
                room: payload.room,
                author: payload.author,
                body: payload.message,
                time: payload.time,
            };
            SendMessageUseCase::new(state.rooms.clone(), state.connections.clone())
                .execute(id, command)
                .await
                .map(|_| ())
                .map_err(send_error)
        }
        ClientEvent::Typing(payload) => {
            SetTypingUseCase::new(state.rooms.clone(), state.connections.clone())
                .execute(id, payload.room, payload.typing)
                .await
                .map(|_| ())
                .map_err(typing_error)
        }
    };

    if let Err(payload) = result {
        tracing::warn!("Rejected event from '{}': {}", id, payload.message);
        reply_error(state, id, payload);
    }
}

/// Queue an `error` event on the connection's own outbox
fn reply_error(state: &AppState, id: &ConnectionId, payload: ErrorPayload) {
    let frame = match ServerEvent::Error(payload).to_json() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Failed to encode error event: {}", e);
            return;
        }
    };
    if let Err(e) = state.connections.deliver(id, &frame) {
        tracing::warn!("Failed to reply to '{}': {}", id, e);
    }
}

fn join_error(error: JoinRoomError) -> ErrorPayload {
    let kind = match error {
        JoinRoomError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        JoinRoomError::NotFound(_) => ErrorKind::NotFound,
    };
    ErrorPayload::new(kind, error.to_string())
}

fn leave_error(error: LeaveRoomError) -> ErrorPayload {
    ErrorPayload::new(ErrorKind::NotFound, error.to_string())
}

fn send_error(error: SendMessageError) -> ErrorPayload {
    let kind = match error {
        SendMessageError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        SendMessageError::NotFound(_) => ErrorKind::NotFound,
        SendMessageError::Rejected(_) | SendMessageError::Encode(_) => ErrorKind::Internal,
    };
    ErrorPayload::new(kind, error.to_string())
}

fn typing_error(error: TypingError) -> ErrorPayload {
    let kind = match error {
        TypingError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        TypingError::NotFound(_) => ErrorKind::NotFound,
        TypingError::Encode(_) => ErrorKind::Internal,
    };
    ErrorPayload::new(kind, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueObjectError;

    #[test]
    fn test_invalid_argument_maps_to_invalid_argument_kind() {
        // テスト項目: 入力不正は invalid_argument として返される
        let payload = send_error(SendMessageError::InvalidArgument(
            ValueObjectError::MessageBodyEmpty,
        ));
        assert_eq!(payload.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_unknown_connection_maps_to_not_found_kind() {
        // テスト項目: 未登録の接続は not_found として返される
        let payload = join_error(JoinRoomError::NotFound("ghost".to_string()));
        assert_eq!(payload.kind, ErrorKind::NotFound);
        assert!(payload.message.contains("ghost"));
    }
}
