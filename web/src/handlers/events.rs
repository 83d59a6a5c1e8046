//! Event endpoints: management CRUD plus the booking surface.
//!
//! - POST   /api/event                     - create an event (auth)
//! - GET    /api/event                     - list events
//! - GET    /api/event/:id                 - get one event
//! - PUT    /api/event/:id                 - partial update (auth)
//! - DELETE /api/event/:id                 - delete (auth)
//! - POST   /api/event/check-availability  - seat availability check
//! - POST   /api/event/book/:id            - book a seat (auth)
//! - DELETE /api/event/cancel/:id          - cancel a booking (auth)
//! - GET    /api/event/bookings            - caller's bookings (auth)

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stayplan_core::types::{Availability, Capacity, Event, EventId, EventStatus, Money};
use uuid::Uuid;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Payload for creating an event. Images are opaque object-storage URLs;
/// the upload itself happens elsewhere.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event name
    pub name: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Where the event takes place
    pub location: String,
    /// Price per attendee
    pub price: Money,
    /// Maximum number of attendees (>= 1)
    pub capacity: u32,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
}

/// Payload for a partial event update; only provided fields are written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New location
    pub location: Option<String>,
    /// New price
    pub price: Option<Money>,
    /// New capacity (>= 1)
    pub capacity: Option<u32>,
}

/// Payload for an availability check.
#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityRequest {
    /// Event to check
    pub event_id: Uuid,
    /// Requested attendee count
    #[serde(default = "default_attendees")]
    pub attendees: u32,
}

const fn default_attendees() -> u32 {
    1
}

/// Public view of an event.
///
/// Booker identities stay internal; clients see the derived status and
/// seat counts instead.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Event id
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Where the event takes place
    pub location: String,
    /// Price per attendee
    pub price: Money,
    /// Maximum number of attendees
    pub capacity: u32,
    /// Seats already booked
    pub booked_seats: u32,
    /// Remaining seats
    pub available_slots: u32,
    /// Derived lifecycle status
    pub status: EventStatus,
    /// Image URLs
    pub images: Vec<String>,
    /// When the event was created
    pub created_at: DateTime<Utc>,
}

impl EventResponse {
    /// Project an event into its public view at `now`.
    #[must_use]
    pub fn from_event(event: Event, now: DateTime<Utc>) -> Self {
        Self {
            id: event.id,
            status: event.status(now),
            booked_seats: event.booked_count(),
            available_slots: event.available_slots(),
            name: event.name,
            description: event.description,
            date: event.date,
            location: event.location,
            price: event.price,
            capacity: event.capacity.value(),
            images: event.images,
            created_at: event.created_at,
        }
    }
}

/// Response for event list endpoints.
#[derive(Debug, Serialize)]
pub struct EventListResponse {
    /// The events, store order
    pub events: Vec<EventResponse>,
}

// ============================================================================
// Management handlers
// ============================================================================

/// Create a new event.
pub async fn create_event(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::validation("Event name cannot be empty"));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::validation("Event description cannot be empty"));
    }
    if request.location.trim().is_empty() {
        return Err(AppError::validation("Event location cannot be empty"));
    }
    let capacity = Capacity::new(request.capacity)
        .ok_or_else(|| AppError::validation("Capacity must be at least 1"))?;

    let now = state.clock.now();
    let event = Event {
        id: EventId::new(),
        name: request.name,
        description: request.description,
        date: request.date,
        location: request.location,
        price: request.price,
        capacity,
        booked_by: vec![],
        images: request.images,
        created_at: now,
    };

    state.events.insert(event.clone()).await.map_err(|e| {
        AppError::internal("Failed to create event").with_source(e.into())
    })?;

    tracing::info!(event_id = %event.id, name = %event.name, "Event created");
    Ok((StatusCode::CREATED, Json(EventResponse::from_event(event, now))))
}

/// List all events.
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<EventListResponse>, AppError> {
    let now = state.clock.now();
    let events = state
        .events
        .list()
        .await
        .map_err(|e| AppError::internal("Failed to list events").with_source(e.into()))?
        .into_iter()
        .map(|event| EventResponse::from_event(event, now))
        .collect();
    Ok(Json(EventListResponse { events }))
}

/// Get a single event by id.
pub async fn get_event(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .events
        .find(EventId::from_uuid(id))
        .await
        .map_err(|e| AppError::internal("Failed to load event").with_source(e.into()))?
        .ok_or_else(|| AppError::not_found("event", id))?;
    Ok(Json(EventResponse::from_event(event, state.clock.now())))
}

/// Partially update an event. Only the provided fields are written.
pub async fn update_event(
    _user: AuthUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let mut event = state
        .events
        .find(EventId::from_uuid(id))
        .await
        .map_err(|e| AppError::internal("Failed to load event").with_source(e.into()))?
        .ok_or_else(|| AppError::not_found("event", id))?;

    if let Some(name) = request.name {
        event.name = name;
    }
    if let Some(description) = request.description {
        event.description = description;
    }
    if let Some(date) = request.date {
        event.date = date;
    }
    if let Some(location) = request.location {
        event.location = location;
    }
    if let Some(price) = request.price {
        event.price = price;
    }
    if let Some(capacity) = request.capacity {
        event.capacity = Capacity::new(capacity)
            .ok_or_else(|| AppError::validation("Capacity must be at least 1"))?;
    }

    state
        .events
        .update(event.clone())
        .await
        .map_err(|e| AppError::internal("Failed to update event").with_source(e.into()))?;

    Ok(Json(EventResponse::from_event(event, state.clock.now())))
}

/// Delete an event.
pub async fn delete_event(
    _user: AuthUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .events
        .delete(EventId::from_uuid(id))
        .await
        .map_err(|e| AppError::internal("Failed to delete event").with_source(e.into()))?;

    if !removed {
        return Err(AppError::not_found("event", id));
    }
    tracing::info!(event_id = %id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Booking handlers
// ============================================================================

/// Check seat availability for an event. Public endpoint.
pub async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<CheckAvailabilityRequest>,
) -> Result<Json<Availability>, AppError> {
    let availability = state
        .engine
        .check_availability(EventId::from_uuid(request.event_id), request.attendees)
        .await?;
    Ok(Json(availability))
}

/// Book one seat on an event for the authenticated caller.
pub async fn book_event(
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.engine.book(EventId::from_uuid(id), user).await?;
    Ok(Json(EventResponse::from_event(event, state.clock.now())))
}

/// Cancel the authenticated caller's booking on an event.
pub async fn cancel_booking(
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.engine.cancel(EventId::from_uuid(id), user).await?;
    Ok(Json(EventResponse::from_event(event, state.clock.now())))
}

/// List the authenticated caller's booked events.
pub async fn my_bookings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<EventListResponse>, AppError> {
    let now = state.clock.now();
    let events = state
        .engine
        .bookings_for(user)
        .await?
        .into_iter()
        .map(|event| EventResponse::from_event(event, now))
        .collect();
    Ok(Json(EventListResponse { events }))
}
