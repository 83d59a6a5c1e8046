//! Router configuration for the Stayplan API.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::{chat, events, health, rooms};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health checks (no authentication)
/// - Event management and booking endpoints
/// - Room inventory endpoints
/// - Itinerary planning endpoints
///
/// Cross-origin requests are allowed (the front-end is served separately)
/// and every request carries a correlation id.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Event management
        .route("/event", post(events::create_event).get(events::list_events))
        .route(
            "/event/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Booking surface
        .route("/event/check-availability", post(events::check_availability))
        .route("/event/book/:id", post(events::book_event))
        .route("/event/cancel/:id", delete(events::cancel_booking))
        .route("/event/bookings", get(events::my_bookings))
        // Room inventory
        .route("/room", post(rooms::create_room).get(rooms::list_rooms))
        // Itinerary planning
        .route("/chat", get(chat::planning_context).post(chat::generate_plan));

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .with_state(state)
        .layer(correlation_id_layer())
        .layer(CorsLayer::permissive())
}
