//! Availability and booking engine for events.
//!
//! Decides, for a single event, whether a booking attempt may proceed and
//! applies the state change. Each operation is one read-modify-write
//! against one event document; atomicity of the write is the store's
//! responsibility (see [`crate::repository`]).

use crate::environment::Clock;
use crate::error::CoreError;
use crate::repository::EventRepository;
use crate::types::{Availability, Event, EventId, UserId};
use std::sync::Arc;

/// Stateless booking service over the event store.
///
/// Holds its collaborators explicitly; cloning is cheap (two `Arc`s), so
/// handlers can share one instance per process.
#[derive(Clone)]
pub struct BookingEngine {
    events: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingEngine {
    /// Creates a new `BookingEngine`.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }

    /// Check whether `requested` seats can be booked on an event.
    ///
    /// `available_slots` is `capacity - |booked_by|` (saturating), and
    /// `is_available` holds exactly when `available_slots >= requested`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidArgument`] if `requested` is zero
    /// - [`CoreError::NotFound`] if the event id does not resolve
    /// - [`CoreError::Repository`] on store failure
    pub async fn check_availability(
        &self,
        event_id: EventId,
        requested: u32,
    ) -> Result<Availability, CoreError> {
        if requested == 0 {
            return Err(CoreError::InvalidArgument(
                "requested seat count must be at least 1".to_string(),
            ));
        }

        let event = self
            .events
            .find(event_id)
            .await?
            .ok_or_else(|| CoreError::event_not_found(event_id))?;

        let available_slots = event.available_slots();
        Ok(Availability {
            is_available: available_slots >= requested,
            available_slots,
        })
    }

    /// Book one seat on an event for a user.
    ///
    /// Preconditions are checked in order: the event exists, the user does
    /// not already hold a booking, the event date has not passed, and a
    /// seat is free. On success the user id is appended to `booked_by` and
    /// the document persisted; the updated snapshot is returned.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the event id does not resolve
    /// - [`CoreError::AlreadyBooked`] if the user already booked
    /// - [`CoreError::EventExpired`] if the event date is in the past
    /// - [`CoreError::EventFull`] if the event is at capacity
    /// - [`CoreError::Repository`] on store failure
    pub async fn book(&self, event_id: EventId, user: UserId) -> Result<Event, CoreError> {
        let mut event = self
            .events
            .find(event_id)
            .await?
            .ok_or_else(|| CoreError::event_not_found(event_id))?;

        if event.is_booked_by(&user) {
            return Err(CoreError::AlreadyBooked);
        }
        if event.date < self.clock.now() {
            return Err(CoreError::EventExpired);
        }
        if event.available_slots() == 0 {
            return Err(CoreError::EventFull);
        }

        event.booked_by.push(user.clone());
        self.events.update(event.clone()).await?;

        tracing::debug!(
            event_id = %event_id,
            user_id = %user,
            booked = event.booked_count(),
            capacity = %event.capacity,
            "Seat booked"
        );

        Ok(event)
    }

    /// Cancel a user's booking on an event.
    ///
    /// Removes the user id from `booked_by` and persists the document;
    /// the updated snapshot is returned.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the event id does not resolve
    /// - [`CoreError::NotBooked`] if the user holds no booking
    /// - [`CoreError::Repository`] on store failure
    pub async fn cancel(&self, event_id: EventId, user: UserId) -> Result<Event, CoreError> {
        let mut event = self
            .events
            .find(event_id)
            .await?
            .ok_or_else(|| CoreError::event_not_found(event_id))?;

        let Some(position) = event.booked_by.iter().position(|u| *u == user) else {
            return Err(CoreError::NotBooked);
        };

        event.booked_by.remove(position);
        self.events.update(event.clone()).await?;

        tracing::debug!(
            event_id = %event_id,
            user_id = %user,
            booked = event.booked_count(),
            "Booking cancelled"
        );

        Ok(event)
    }

    /// List all events the user currently holds a booking on, store order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Repository`] on store failure.
    pub async fn bookings_for(&self, user: UserId) -> Result<Vec<Event>, CoreError> {
        Ok(self.events.find_booked_by(user).await?)
    }
}

