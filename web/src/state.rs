//! Application state for the Stayplan HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers: the booking
//! engine, the itinerary planner, the repositories behind them, and the
//! identity provider. Everything is behind an `Arc`, so the state is
//! cloned cheaply per request.

use crate::auth::IdentityProvider;
use stayplan_core::booking::BookingEngine;
use stayplan_core::environment::Clock;
use stayplan_core::oracle::PlanningOracle;
use stayplan_core::planner::ItineraryPlanner;
use stayplan_core::repository::{EventRepository, RoomRepository};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Booking engine for event availability, booking and cancellation
    pub engine: BookingEngine,
    /// Itinerary planner for budget-constrained plan generation
    pub planner: ItineraryPlanner,
    /// Event store (CRUD handlers use it directly)
    pub events: Arc<dyn EventRepository>,
    /// Room store (CRUD handlers use it directly)
    pub rooms: Arc<dyn RoomRepository>,
    /// Identity provider for bearer token verification
    pub identity: Arc<dyn IdentityProvider>,
    /// Clock shared with the domain services
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Assemble the application state from its collaborators.
    ///
    /// The booking engine and planner are built here so that every handler
    /// shares the same store handles and clock.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        rooms: Arc<dyn RoomRepository>,
        oracle: Arc<dyn PlanningOracle>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let engine = BookingEngine::new(events.clone(), clock.clone());
        let planner = ItineraryPlanner::new(
            rooms.clone(),
            events.clone(),
            oracle,
            clock.clone(),
        );
        Self {
            engine,
            planner,
            events,
            rooms,
            identity,
            clock,
        }
    }
}
