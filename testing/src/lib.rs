//! # Stayplan Testing
//!
//! Testing utilities for the Stayplan booking system:
//!
//! - In-memory implementations of the repository traits
//! - A fixed clock for deterministic time
//! - A scripted planning oracle with call accounting
//!
//! These mocks keep tests fast and deterministic; no external services are
//! required.
//!
//! ## Example
//!
//! ```ignore
//! use stayplan_testing::mocks::{test_clock, InMemoryEventRepository, ScriptedOracle};
//! use stayplan_core::booking::BookingEngine;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn books_a_seat() {
//!     let repo = Arc::new(InMemoryEventRepository::new());
//!     let engine = BookingEngine::new(repo, Arc::new(test_clock()));
//!     // ...
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Mock implementations of the core collaborator traits.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use stayplan_core::environment::Clock;
    use stayplan_core::oracle::{OracleError, PlanningOracle};
    use stayplan_core::repository::{
        EventRepository, RepositoryError, RoomRepository,
    };
    use stayplan_core::types::{Event, EventId, Room, RoomId, UserId};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, RwLock};

    type RepoFuture<'a, T> =
        Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory event store preserving insertion order.
    ///
    /// Backed by a `Vec` under an `RwLock` so `list` returns documents in
    /// store order, matching the repository contract.
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryEventRepository {
        events: Arc<RwLock<Vec<Event>>>,
    }

    impl InMemoryEventRepository {
        /// Create a new empty repository
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Clear all events (for test isolation)
        #[allow(clippy::unwrap_used)]
        pub fn clear(&self) {
            self.events.write().unwrap().clear();
        }

        /// Number of stored events
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn len(&self) -> usize {
            self.events.read().unwrap().len()
        }

        /// Check if the repository is empty
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn is_empty(&self) -> bool {
            self.events.read().unwrap().is_empty()
        }
    }

    #[allow(clippy::unwrap_used)]
    impl EventRepository for InMemoryEventRepository {
        fn insert(&self, event: Event) -> RepoFuture<'_, ()> {
            self.events.write().unwrap().push(event);
            Box::pin(async { Ok(()) })
        }

        fn find(&self, id: EventId) -> RepoFuture<'_, Option<Event>> {
            let found = self
                .events
                .read()
                .unwrap()
                .iter()
                .find(|event| event.id == id)
                .cloned();
            Box::pin(async move { Ok(found) })
        }

        fn list(&self) -> RepoFuture<'_, Vec<Event>> {
            let all = self.events.read().unwrap().clone();
            Box::pin(async move { Ok(all) })
        }

        fn update(&self, event: Event) -> RepoFuture<'_, ()> {
            let mut events = self.events.write().unwrap();
            let result = match events.iter_mut().find(|stored| stored.id == event.id) {
                Some(stored) => {
                    *stored = event;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound(format!("event {}", event.id))),
            };
            Box::pin(async move { result })
        }

        fn delete(&self, id: EventId) -> RepoFuture<'_, bool> {
            let mut events = self.events.write().unwrap();
            let before = events.len();
            events.retain(|event| event.id != id);
            let removed = events.len() < before;
            Box::pin(async move { Ok(removed) })
        }

        fn find_booked_by(&self, user: UserId) -> RepoFuture<'_, Vec<Event>> {
            let booked = self
                .events
                .read()
                .unwrap()
                .iter()
                .filter(|event| event.is_booked_by(&user))
                .cloned()
                .collect();
            Box::pin(async move { Ok(booked) })
        }
    }

    /// In-memory room store preserving insertion order.
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryRoomRepository {
        rooms: Arc<RwLock<Vec<Room>>>,
    }

    impl InMemoryRoomRepository {
        /// Create a new empty repository
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Clear all rooms (for test isolation)
        #[allow(clippy::unwrap_used)]
        pub fn clear(&self) {
            self.rooms.write().unwrap().clear();
        }

        /// Number of stored rooms
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn len(&self) -> usize {
            self.rooms.read().unwrap().len()
        }

        /// Check if the repository is empty
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn is_empty(&self) -> bool {
            self.rooms.read().unwrap().is_empty()
        }
    }

    #[allow(clippy::unwrap_used)]
    impl RoomRepository for InMemoryRoomRepository {
        fn insert(&self, room: Room) -> RepoFuture<'_, ()> {
            self.rooms.write().unwrap().push(room);
            Box::pin(async { Ok(()) })
        }

        fn find(&self, id: RoomId) -> RepoFuture<'_, Option<Room>> {
            let found = self
                .rooms
                .read()
                .unwrap()
                .iter()
                .find(|room| room.id == id)
                .cloned();
            Box::pin(async move { Ok(found) })
        }

        fn list(&self) -> RepoFuture<'_, Vec<Room>> {
            let all = self.rooms.read().unwrap().clone();
            Box::pin(async move { Ok(all) })
        }

        fn list_available(&self) -> RepoFuture<'_, Vec<Room>> {
            let available = self
                .rooms
                .read()
                .unwrap()
                .iter()
                .filter(|room| room.is_available)
                .cloned()
                .collect();
            Box::pin(async move { Ok(available) })
        }
    }

    /// Scripted planning oracle.
    ///
    /// Returns queued responses in order and counts calls, so tests can
    /// assert both on the produced plans and on whether the oracle was
    /// consulted at all. Calling past the end of the script returns
    /// `OracleError::Unavailable`.
    #[derive(Debug, Default)]
    pub struct ScriptedOracle {
        responses: Mutex<Vec<Result<String, OracleError>>>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        /// Create an oracle that replays `responses` in order
        #[must_use]
        pub fn new(responses: Vec<Result<String, OracleError>>) -> Self {
            let mut queued = responses;
            // Stored reversed so each call can pop from the back.
            queued.reverse();
            Self {
                responses: Mutex::new(queued),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Number of times the oracle was called
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Prompts received so far, in call order
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[allow(clippy::unwrap_used)]
    impl PlanningOracle for ScriptedOracle {
        fn propose(
            &self,
            prompt: String,
        ) -> Pin<Box<dyn Future<Output = Result<String, OracleError>> + Send + '_>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt);
            let response = self.responses.lock().unwrap().pop().unwrap_or_else(|| {
                Err(OracleError::Unavailable(
                    "scripted oracle exhausted".to_string(),
                ))
            });
            Box::pin(async move { response })
        }
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, InMemoryEventRepository, InMemoryRoomRepository, ScriptedOracle};
