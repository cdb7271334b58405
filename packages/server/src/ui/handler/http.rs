//! HTTP API endpoint handlers.

use std::sync::Arc;

use agora_shared::time::millis_to_rfc3339;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::{
        MessageDto,
        http::{HealthDto, RoomDetailDto, RoomSummaryDto},
    },
    ui::state::AppState,
    usecase::GetHistoryUseCase,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.connections.count(),
    })
}

/// History of a room in append order; unknown rooms yield an empty array
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Json<Vec<MessageDto>> {
    let history = GetHistoryUseCase::new(state.rooms.clone())
        .execute(room)
        .await;
    Json(history.iter().map(MessageDto::from).collect())
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.rooms.list_rooms().await;

    Json(
        rooms
            .into_iter()
            .map(|room| RoomSummaryDto {
                id: room.id.as_str().to_string(),
                members: room.members.len(),
                message_count: room.messages.len(),
                created_at: millis_to_rfc3339(room.created_at.value()),
            })
            .collect(),
    )
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .rooms
        .get_room(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let room_detail = RoomDetailDto {
        id: room.id.as_str().to_string(),
        members: room
            .members
            .iter()
            .map(|member| member.as_str().to_string())
            .collect(),
        message_count: room.messages.len(),
        created_at: millis_to_rfc3339(room.created_at.value()),
    };

    Ok(Json(room_detail))
}
