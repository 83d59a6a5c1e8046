//! Repository traits for the persistent store.
//!
//! The booking engine and itinerary planner never talk to a database
//! directly; they depend on these traits. The store is an external
//! collaborator assumed to provide per-document atomic replace, and the
//! repositories add no locking of their own.
//!
//! # Implementations
//!
//! - `PostgresEventRepository` / `PostgresRoomRepository`
//!   (in `stayplan-postgres`): production implementation
//! - `InMemoryEventRepository` / `InMemoryRoomRepository`
//!   (in `stayplan-testing`): fast, deterministic testing
//!
//! # Dyn Compatibility
//!
//! These traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn EventRepository>`),
//! which is how handlers and services hold their store handles.

use crate::types::{Event, EventId, Room, RoomId, UserId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by repository methods.
type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The document targeted by an update does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Document store for [`Event`] entities.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to be shared across request
/// handlers as `Arc<dyn EventRepository>`.
///
/// # Concurrency
///
/// `update` is a full-document replace. The store is assumed to apply each
/// replace atomically; concurrent writers to the same document race under
/// the store's native concurrency control. There is no optimistic-retry
/// loop here.
pub trait EventRepository: Send + Sync {
    /// Persist a new event document.
    fn insert(&self, event: Event) -> RepoFuture<'_, ()>;

    /// Load an event by id. Returns `Ok(None)` when the id does not resolve.
    fn find(&self, id: EventId) -> RepoFuture<'_, Option<Event>>;

    /// Load all events in store order.
    fn list(&self) -> RepoFuture<'_, Vec<Event>>;

    /// Replace an existing event document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no document with the
    /// event's id exists.
    fn update(&self, event: Event) -> RepoFuture<'_, ()>;

    /// Delete an event by id. Returns whether a document was removed.
    fn delete(&self, id: EventId) -> RepoFuture<'_, bool>;

    /// Load all events whose `booked_by` set contains `user`, store order.
    fn find_booked_by(&self, user: UserId) -> RepoFuture<'_, Vec<Event>>;
}

/// Document store for [`Room`] entities.
pub trait RoomRepository: Send + Sync {
    /// Persist a new room document.
    fn insert(&self, room: Room) -> RepoFuture<'_, ()>;

    /// Load a room by id. Returns `Ok(None)` when the id does not resolve.
    fn find(&self, id: RoomId) -> RepoFuture<'_, Option<Room>>;

    /// Load all rooms in store order.
    fn list(&self) -> RepoFuture<'_, Vec<Room>>;

    /// Load rooms currently offered (`is_available == true`).
    fn list_available(&self) -> RepoFuture<'_, Vec<Room>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_error_display() {
        let err = RepositoryError::NotFound("event 42".to_string());
        assert_eq!(err.to_string(), "document not found: event 42");

        let err = RepositoryError::Database("pool timed out".to_string());
        assert!(err.to_string().contains("pool timed out"));
    }
}
