//! Room inventory endpoints.
//!
//! Rooms are the priced lodging options the itinerary planner allocates
//! from; room *bookings* are handled by an external collaborator and have
//! no endpoint here.
//!
//! - POST /api/room - create a room (auth)
//! - GET  /api/room - list rooms

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use stayplan_core::types::{Money, Room, RoomId};

/// Payload for creating a room.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    /// Room type (e.g., "Deluxe Suite")
    pub room_type: String,
    /// Price for one night
    pub price_per_night: Money,
    /// Amenity names
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Whether the room is offered immediately
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
}

const fn default_available() -> bool {
    true
}

/// Response for the room list endpoint.
#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    /// The rooms, store order
    pub rooms: Vec<Room>,
}

/// Create a new room.
pub async fn create_room(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    if request.room_type.trim().is_empty() {
        return Err(AppError::validation("Room type cannot be empty"));
    }

    let room = Room {
        id: RoomId::new(),
        room_type: request.room_type,
        price_per_night: request.price_per_night,
        amenities: request.amenities,
        is_available: request.is_available,
        images: request.images,
    };

    state
        .rooms
        .insert(room.clone())
        .await
        .map_err(|e| AppError::internal("Failed to create room").with_source(e.into()))?;

    tracing::info!(room_id = %room.id, room_type = %room.room_type, "Room created");
    Ok((StatusCode::CREATED, Json(room)))
}

/// List all rooms.
pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<RoomListResponse>, AppError> {
    let rooms = state
        .rooms
        .list()
        .await
        .map_err(|e| AppError::internal("Failed to list rooms").with_source(e.into()))?;
    Ok(Json(RoomListResponse { rooms }))
}
