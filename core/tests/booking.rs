#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use stayplan_core::booking::BookingEngine;
    use stayplan_core::environment::Clock;
    use stayplan_core::repository::EventRepository;
    use stayplan_core::types::{Capacity, Event, EventId, Money, UserId};
    use stayplan_core::CoreError;
    use chrono::{Duration, Utc};
    use stayplan_testing::mocks::{test_clock, InMemoryEventRepository};

    fn future_event(capacity: u32) -> Event {
        let now = test_clock().now();
        Event {
            id: EventId::new(),
            name: "Harbor Cruise".to_string(),
            description: "Two hours on the bay".to_string(),
            date: now + Duration::days(10),
            location: "Pier 3".to_string(),
            price: Money::from_cents(30),
            capacity: Capacity::new(capacity).unwrap(),
            booked_by: vec![],
            images: vec![],
            created_at: now,
        }
    }

    async fn engine_with(events: Vec<Event>) -> (BookingEngine, Arc<InMemoryEventRepository>) {
        let repo = Arc::new(InMemoryEventRepository::new());
        for event in events {
            repo.insert(event).await.unwrap();
        }
        let engine = BookingEngine::new(repo.clone(), Arc::new(test_clock()));
        (engine, repo)
    }

    #[tokio::test]
    async fn check_availability_reports_remaining_slots() {
        let event = future_event(3);
        let id = event.id;
        let (engine, _) = engine_with(vec![event]).await;

        let availability = engine.check_availability(id, 2).await.unwrap();
        assert!(availability.is_available);
        assert_eq!(availability.available_slots, 3);

        let availability = engine.check_availability(id, 4).await.unwrap();
        assert!(!availability.is_available);
    }

    #[tokio::test]
    async fn check_availability_boundary_is_exact() {
        // is_available flips exactly when capacity - booked < requested.
        let mut event = future_event(3);
        event.booked_by = vec![UserId::new("u1"), UserId::new("u2")];
        let id = event.id;
        let (engine, _) = engine_with(vec![event]).await;

        assert!(engine.check_availability(id, 1).await.unwrap().is_available);
        assert!(!engine.check_availability(id, 2).await.unwrap().is_available);
    }

    #[tokio::test]
    async fn check_availability_rejects_zero_request() {
        let event = future_event(3);
        let id = event.id;
        let (engine, _) = engine_with(vec![event]).await;

        let err = engine.check_availability(id, 0).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn check_availability_unknown_event() {
        let (engine, _) = engine_with(vec![]).await;
        let err = engine.check_availability(EventId::new(), 1).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "event", .. }));
    }

    #[tokio::test]
    async fn book_appends_user_and_persists() {
        let event = future_event(2);
        let id = event.id;
        let (engine, repo) = engine_with(vec![event]).await;

        let updated = engine.book(id, UserId::new("alice")).await.unwrap();
        assert!(updated.is_booked_by(&UserId::new("alice")));

        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.booked_count(), 1);
    }

    #[tokio::test]
    async fn book_is_idempotent_rejecting() {
        let event = future_event(2);
        let id = event.id;
        let (engine, repo) = engine_with(vec![event]).await;

        engine.book(id, UserId::new("alice")).await.unwrap();
        let err = engine.book(id, UserId::new("alice")).await.unwrap_err();
        assert!(matches!(err, CoreError::AlreadyBooked));

        // Membership unchanged by the rejected call.
        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.booked_count(), 1);
    }

    #[tokio::test]
    async fn book_rejects_expired_event() {
        let mut event = future_event(2);
        event.date = test_clock().now() - Duration::hours(1);
        let id = event.id;
        let (engine, _) = engine_with(vec![event]).await;

        let err = engine.book(id, UserId::new("alice")).await.unwrap_err();
        assert!(matches!(err, CoreError::EventExpired));
    }

    #[tokio::test]
    async fn book_enforces_capacity() {
        let event = future_event(2);
        let id = event.id;
        let (engine, repo) = engine_with(vec![event]).await;

        engine.book(id, UserId::new("u1")).await.unwrap();
        engine.book(id, UserId::new("u2")).await.unwrap();
        let err = engine.book(id, UserId::new("u3")).await.unwrap_err();
        assert!(matches!(err, CoreError::EventFull));

        // |booked_by| <= capacity holds after any operation sequence.
        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.booked_count(), stored.capacity.value());
    }

    #[tokio::test]
    async fn cancel_then_book_restores_membership() {
        let event = future_event(2);
        let id = event.id;
        let (engine, _) = engine_with(vec![event]).await;
        let alice = UserId::new("alice");

        engine.book(id, alice.clone()).await.unwrap();
        let after_cancel = engine.cancel(id, alice.clone()).await.unwrap();
        assert!(!after_cancel.is_booked_by(&alice));

        let rebooked = engine.book(id, alice.clone()).await.unwrap();
        assert!(rebooked.is_booked_by(&alice));
        assert_eq!(rebooked.booked_count(), 1);
    }

    #[tokio::test]
    async fn cancel_non_member_is_rejected_without_mutation() {
        let mut event = future_event(2);
        event.booked_by = vec![UserId::new("bob")];
        let id = event.id;
        let (engine, repo) = engine_with(vec![event]).await;

        let err = engine.cancel(id, UserId::new("alice")).await.unwrap_err();
        assert!(matches!(err, CoreError::NotBooked));

        let stored = repo.find(id).await.unwrap().unwrap();
        assert_eq!(stored.booked_by, vec![UserId::new("bob")]);
    }

    #[tokio::test]
    async fn bookings_for_filters_by_membership() {
        let mut first = future_event(5);
        first.booked_by = vec![UserId::new("alice"), UserId::new("bob")];
        let mut second = future_event(5);
        second.booked_by = vec![UserId::new("bob")];
        let third = future_event(5);

        let first_id = first.id;
        let (engine, _) = engine_with(vec![first, second, third]).await;

        let bookings = engine.bookings_for(UserId::new("alice")).await.unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, first_id);

        let bookings = engine.bookings_for(UserId::new("carol")).await.unwrap();
        assert!(bookings.is_empty());
    }
}
