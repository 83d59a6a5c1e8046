//! Itinerary planning endpoints.
//!
//! - GET  /api/chat - planning context: candidate rooms and open events
//! - POST /api/chat - generate a budget-constrained itinerary (auth)
//!
//! Plans are derived per request and never persisted; the GET endpoint
//! serves the inventory a client needs to build a planning request.

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::handlers::events::EventResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use stayplan_core::planner::{ItineraryPlan, ItineraryRequest};
use stayplan_core::types::Room;

/// Response for the planning context endpoint.
#[derive(Debug, Serialize)]
pub struct PlanningContextResponse {
    /// Rooms currently offered
    pub rooms: Vec<Room>,
    /// Events open for booking
    pub events: Vec<EventResponse>,
}

/// Serve the candidate inventory for planning. Public endpoint.
pub async fn planning_context(
    State(state): State<AppState>,
) -> Result<Json<PlanningContextResponse>, AppError> {
    let now = state.clock.now();
    let context = state.planner.planning_context().await?;
    Ok(Json(PlanningContextResponse {
        rooms: context.rooms,
        events: context
            .events
            .into_iter()
            .map(|event| EventResponse::from_event(event, now))
            .collect(),
    }))
}

/// Generate an itinerary plan for the authenticated caller.
///
/// An unusable oracle response still yields a 200 with a fallback plan
/// (empty allocation, minimum feasible budget, explanatory notice); only
/// delivery failures and empty inventory are reported as errors.
pub async fn generate_plan(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ItineraryRequest>,
) -> Result<Json<ItineraryPlan>, AppError> {
    tracing::info!(
        user_id = %user,
        budget = %request.budget,
        nights = request.length_of_stay,
        "Generating itinerary plan"
    );
    let plan = state.planner.plan(request).await?;
    Ok(Json(plan))
}
