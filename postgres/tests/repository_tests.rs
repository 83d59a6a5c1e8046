//! Integration tests for the `PostgreSQL` repositories.
//!
//! These tests run against a real database and are ignored by default.
//! Point `STAYPLAN_TEST_DATABASE_URL` at a scratch database and run:
//!
//! ```bash
//! STAYPLAN_TEST_DATABASE_URL=postgres://localhost/stayplan_test \
//!     cargo test -p stayplan-postgres -- --ignored
//! ```

#![allow(clippy::expect_used)] // Test code uses expect for clear failure messages

use chrono::{Duration, Utc};
use stayplan_core::repository::{EventRepository, RoomRepository};
use stayplan_core::types::{Capacity, Event, EventId, Money, Room, RoomId, UserId};
use stayplan_postgres::{connect, ensure_schema, PostgresEventRepository, PostgresRoomRepository};

async fn test_pool() -> sqlx::PgPool {
    let url = std::env::var("STAYPLAN_TEST_DATABASE_URL")
        .expect("STAYPLAN_TEST_DATABASE_URL must point at a scratch database");
    let pool = connect(&url, 5).await.expect("Failed to connect");
    ensure_schema(&pool).await.expect("Failed to run schema");
    pool
}

fn sample_event(name: &str) -> Event {
    Event {
        id: EventId::new(),
        name: name.to_string(),
        description: "integration test event".to_string(),
        date: Utc::now() + Duration::days(14),
        location: "Test Hall".to_string(),
        price: Money::from_cents(45),
        capacity: Capacity::new(10).expect("nonzero"),
        booked_by: vec![],
        images: vec!["https://img.example/1.jpg".to_string()],
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[ignore = "requires STAYPLAN_TEST_DATABASE_URL"]
async fn event_document_round_trip() {
    let pool = test_pool().await;
    let repo = PostgresEventRepository::new(pool);

    let mut event = sample_event("Round Trip Concert");
    let id = event.id;
    repo.insert(event.clone()).await.expect("insert");

    let stored = repo.find(id).await.expect("find").expect("present");
    assert_eq!(stored, event);

    event.booked_by.push(UserId::new("user_pg_1"));
    repo.update(event.clone()).await.expect("update");

    let stored = repo.find(id).await.expect("find").expect("present");
    assert_eq!(stored.booked_by, vec![UserId::new("user_pg_1")]);

    assert!(repo.delete(id).await.expect("delete"));
    assert!(repo.find(id).await.expect("find").is_none());
}

#[tokio::test]
#[ignore = "requires STAYPLAN_TEST_DATABASE_URL"]
async fn find_booked_by_filters_on_array_membership() {
    let pool = test_pool().await;
    let repo = PostgresEventRepository::new(pool);

    let user = UserId::new(format!("user_pg_{}", uuid::Uuid::new_v4()));

    let mut booked = sample_event("Booked Event");
    booked.booked_by.push(user.clone());
    let other = sample_event("Other Event");

    repo.insert(booked.clone()).await.expect("insert");
    repo.insert(other.clone()).await.expect("insert");

    let results = repo.find_booked_by(user).await.expect("query");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, booked.id);

    repo.delete(booked.id).await.expect("cleanup");
    repo.delete(other.id).await.expect("cleanup");
}

#[tokio::test]
#[ignore = "requires STAYPLAN_TEST_DATABASE_URL"]
async fn room_availability_filter() {
    let pool = test_pool().await;
    let repo = PostgresRoomRepository::new(pool);

    let available = Room {
        id: RoomId::new(),
        room_type: "Deluxe Suite".to_string(),
        price_per_night: Money::from_cents(150),
        amenities: vec!["WiFi".to_string(), "Pool".to_string()],
        is_available: true,
        images: vec![],
    };
    let hidden = Room {
        id: RoomId::new(),
        room_type: "Closed Wing".to_string(),
        price_per_night: Money::from_cents(90),
        amenities: vec![],
        is_available: false,
        images: vec![],
    };

    repo.insert(available.clone()).await.expect("insert");
    repo.insert(hidden.clone()).await.expect("insert");

    let listed = repo.list_available().await.expect("query");
    assert!(listed.iter().any(|room| room.id == available.id));
    assert!(listed.iter().all(|room| room.id != hidden.id));
}
