//! Error taxonomy for the booking engine and itinerary planner.

use crate::oracle::OracleError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// Errors produced by the core domain operations.
///
/// Store-layer failures are wrapped in `Repository` and reported to callers
/// as a generic internal failure by the HTTP layer; every other variant maps
/// to a client-visible condition.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing input, rejected before any store or oracle access
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity id did not resolve
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind ("event", "room")
        entity: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// The user already holds a booking for this event
    #[error("user already booked this event")]
    AlreadyBooked,

    /// The user holds no booking for this event
    #[error("user has not booked this event")]
    NotBooked,

    /// The event date is in the past
    #[error("event date has passed")]
    EventExpired,

    /// The event is at capacity
    #[error("event is fully booked")]
    EventFull,

    /// No room/event combination exists at any budget
    #[error("no rooms or events available to create a plan")]
    NoInventoryAvailable,

    /// Persistent store failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Planning oracle transport failure.
    ///
    /// Unusable oracle *output* is not an error: the planner recovers it
    /// with a fallback plan. This variant is for delivery failures only.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CoreError {
    /// Shorthand for a `NotFound` error for an event id.
    #[must_use]
    pub fn event_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "event",
            id: id.to_string(),
        }
    }

    /// Shorthand for a `NotFound` error for a room id.
    #[must_use]
    pub fn room_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "room",
            id: id.to_string(),
        }
    }
}
