//! Domain types for the Stayplan booking system.
//!
//! This module contains the value objects and entities shared by the booking
//! engine and the itinerary planner: identifiers, money, capacity, and the
//! `Event` and `Room` entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a room
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Creates a new random `RoomId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RoomId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a user.
///
/// User identities are issued by the external identity provider and treated
/// as opaque strings; they are never parsed or generated locally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId` from a provider-issued string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (minor-units based to avoid floating point errors)
// ============================================================================

/// Represents money in minor currency units to avoid floating-point
/// arithmetic errors. All API values use the same unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// The zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from minor units
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Subtracts two money amounts (returns None if result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(self.0 - other.0))
        } else {
            None
        }
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Converts a raw floating-point amount (as produced by external
    /// planners) to `Money`, rounding to the nearest minor unit.
    /// Negative and non-finite values become zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64_lossy(amount: f64) -> Self {
        if amount.is_finite() && amount > 0.0 {
            Self(amount.round() as u64)
        } else {
            Self::ZERO
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Capacity
// ============================================================================

/// Represents the attendee capacity of an event.
///
/// A valid capacity is at least one; `Capacity::new` rejects zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capacity(u32);

impl Capacity {
    /// Creates a new `Capacity`. Returns `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the capacity value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Domain Entities
// ============================================================================

/// Event entity: a scheduled, capacity-bounded activity bookable by users.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,
    /// Event name (e.g., "Wine Tasting Evening")
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
    pub capacity: Capacity,
    /// Identities of users who booked the event. Set semantics: a user
    /// appears at most once; mutations go through the booking engine.
    pub booked_by: Vec<UserId>,
    /// Opaque object-storage URLs for event images
    pub images: Vec<String>,
    /// When the event was created
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Number of seats already booked
    #[must_use]
    pub fn booked_count(&self) -> u32 {
        u32::try_from(self.booked_by.len()).unwrap_or(u32::MAX)
    }

    /// Remaining seats: `capacity - |booked_by|`, saturating at zero
    #[must_use]
    pub fn available_slots(&self) -> u32 {
        self.capacity.value().saturating_sub(self.booked_count())
    }

    /// Checks whether the given user currently holds a booking
    #[must_use]
    pub fn is_booked_by(&self, user: &UserId) -> bool {
        self.booked_by.contains(user)
    }

    /// Derived lifecycle status, computed from the event date and the
    /// booked set. Status is never stored.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> EventStatus {
        if self.date < now {
            EventStatus::Closed
        } else if self.available_slots() == 0 {
            EventStatus::Full
        } else {
            EventStatus::Open
        }
    }

    /// Convenience check: the event is bookable in principle at `now`
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == EventStatus::Open
    }
}

/// Derived event lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Upcoming and has free seats
    Open,
    /// Upcoming but at capacity
    Full,
    /// The event date has passed
    Closed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Full => write!(f, "full"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Room entity: a priced lodging unit offered nightly.
///
/// Rooms are read by the itinerary planner as priced options; the room
/// booking lifecycle itself belongs to an external collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier
    pub id: RoomId,
    /// Room type (e.g., "Deluxe Suite")
    pub room_type: String,
    /// Price for one night
    pub price_per_night: Money,
    /// Amenity names (e.g., "WiFi", "Pool")
    pub amenities: Vec<String>,
    /// Whether the room is currently offered
    pub is_available: bool,
    /// Opaque object-storage URLs for room images
    pub images: Vec<String>,
}

// ============================================================================
// Availability
// ============================================================================

/// Result of an availability check for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether the requested number of seats can be booked
    pub is_available: bool,
    /// Remaining seats at the time of the check
    pub available_slots: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_event(capacity: u32, booked: &[&str]) -> Event {
        Event {
            id: EventId::new(),
            name: "City Walking Tour".to_string(),
            description: "A guided walk".to_string(),
            date: Utc::now() + Duration::days(7),
            location: "Old Town".to_string(),
            price: Money::from_cents(25),
            capacity: Capacity::new(capacity).expect("nonzero"),
            booked_by: booked.iter().map(|u| UserId::new(*u)).collect(),
            images: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn capacity_rejects_zero() {
        assert!(Capacity::new(0).is_none());
        assert_eq!(Capacity::new(3).map(|c| c.value()), Some(3));
    }

    #[test]
    fn available_slots_saturates() {
        let mut event = sample_event(2, &["a", "b"]);
        assert_eq!(event.available_slots(), 0);
        // An over-booked document (e.g. hand-edited) must not underflow.
        event.booked_by.push(UserId::new("c"));
        assert_eq!(event.available_slots(), 0);
    }

    #[test]
    fn status_is_derived_from_date_and_bookings() {
        let now = Utc::now();
        let mut event = sample_event(2, &["a"]);
        assert_eq!(event.status(now), EventStatus::Open);

        event.booked_by.push(UserId::new("b"));
        assert_eq!(event.status(now), EventStatus::Full);

        event.date = now - Duration::hours(1);
        assert_eq!(event.status(now), EventStatus::Closed);
    }

    #[test]
    fn money_checked_arithmetic() {
        let a = Money::from_cents(100);
        let b = Money::from_cents(40);
        assert_eq!(a.checked_add(b), Some(Money::from_cents(140)));
        assert_eq!(a.checked_sub(b), Some(Money::from_cents(60)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(a.checked_multiply(3), Some(Money::from_cents(300)));
        assert_eq!(Money::from_cents(u64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn money_from_f64_lossy_rounds_and_clamps() {
        assert_eq!(Money::from_f64_lossy(99.6), Money::from_cents(100));
        assert_eq!(Money::from_f64_lossy(-5.0), Money::ZERO);
        assert_eq!(Money::from_f64_lossy(f64::NAN), Money::ZERO);
    }
}
