//! # Stayplan Web
//!
//! Axum HTTP surface for the Stayplan booking system.
//!
//! The handlers are thin adapters: requests are parsed and authenticated
//! here, then handed to the booking engine and itinerary planner from
//! `stayplan-core`; domain errors map onto the HTTP taxonomy in
//! [`error::AppError`].
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Authentication** (where required) via the [`auth::AuthUser`] extractor
//! 3. **Domain call** on [`state::AppState`]'s engine or planner
//! 4. **Response mapping** to JSON, errors via `AppError`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use auth::{AuthUser, IdentityProvider, RemoteIdentityProvider, StaticTokenIdentity};
pub use config::Config;
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
