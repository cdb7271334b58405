//! HTTP API response DTOs for the chat application.

use serde::{Deserialize, Serialize};

/// Room summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: usize,
    pub message_count: usize,
    pub created_at: String, // RFC 3339
}

/// Room detail for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    /// Connection IDs of the current members
    pub members: Vec<String>,
    pub message_count: usize,
    pub created_at: String, // RFC 3339
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
}
