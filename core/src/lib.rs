//! # Stayplan Core
//!
//! Domain logic for the Stayplan hotel-and-event booking system:
//!
//! - **Booking engine** ([`booking`]): capacity-aware event booking and
//!   cancellation over a persistent document store.
//! - **Itinerary planner** ([`planner`]): budget-constrained allocation of
//!   one room plus one event per day, delegating candidate selection to an
//!   unreliable external planning oracle and validating its output.
//!
//! External collaborators (store, oracle, clock) are passed in explicitly
//! via trait objects; this crate holds no process-wide mutable state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod booking;
pub mod error;
pub mod oracle;
pub mod planner;
pub mod repository;
pub mod types;

pub use error::CoreError;

/// Environment traits: capabilities handed to services rather than reached
/// for globally, so tests can substitute deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
