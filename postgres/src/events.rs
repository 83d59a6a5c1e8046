//! `PostgreSQL`-backed event repository.

use crate::db_err;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use stayplan_core::repository::{EventRepository, RepositoryError};
use stayplan_core::types::{Capacity, Event, EventId, Money, UserId};
use std::future::Future;
use std::pin::Pin;

type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

const SELECT_COLUMNS: &str =
    "id, name, description, date, location, price, capacity, booked_by, images, created_at";

/// Event repository backed by the `events` table.
///
/// Each event is one row; `booked_by` is a `TEXT[]` of provider-issued user
/// ids. `update` replaces the full document in a single statement, which is
/// the per-document atomicity the booking engine relies on.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a repository over an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_event(row: &PgRow) -> Result<Event, RepositoryError> {
    let price: i64 = row.try_get("price").map_err(db_err)?;
    let price = u64::try_from(price)
        .map_err(|_| RepositoryError::Serialization("negative price".to_string()))?;

    let capacity: i32 = row.try_get("capacity").map_err(db_err)?;
    let capacity = u32::try_from(capacity)
        .ok()
        .and_then(Capacity::new)
        .ok_or_else(|| RepositoryError::Serialization("invalid capacity".to_string()))?;

    let booked_by: Vec<String> = row.try_get("booked_by").map_err(db_err)?;

    Ok(Event {
        id: EventId::from_uuid(row.try_get("id").map_err(db_err)?),
        name: row.try_get("name").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        date: row.try_get("date").map_err(db_err)?,
        location: row.try_get("location").map_err(db_err)?,
        price: Money::from_cents(price),
        capacity,
        booked_by: booked_by.into_iter().map(UserId::new).collect(),
        images: row.try_get("images").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn booked_by_strings(event: &Event) -> Vec<String> {
    event
        .booked_by
        .iter()
        .map(|user| user.as_str().to_string())
        .collect()
}

fn price_as_i64(price: Money) -> Result<i64, RepositoryError> {
    i64::try_from(price.cents())
        .map_err(|_| RepositoryError::Serialization("price exceeds storage range".to_string()))
}

fn capacity_as_i32(capacity: Capacity) -> Result<i32, RepositoryError> {
    i32::try_from(capacity.value())
        .map_err(|_| RepositoryError::Serialization("capacity exceeds storage range".to_string()))
}

impl EventRepository for PostgresEventRepository {
    fn insert(&self, event: Event) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO events
                    (id, name, description, date, location, price, capacity, booked_by, images, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(event.id.as_uuid())
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(price_as_i64(event.price)?)
            .bind(capacity_as_i32(event.capacity)?)
            .bind(booked_by_strings(&event))
            .bind(&event.images)
            .bind(event.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn find(&self, id: EventId) -> RepoFuture<'_, Option<Event>> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM events WHERE id = $1"
            ))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

            row.as_ref().map(row_to_event).transpose()
        })
    }

    fn list(&self) -> RepoFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM events ORDER BY position"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter().map(row_to_event).collect()
        })
    }

    fn update(&self, event: Event) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            let result = sqlx::query(
                r"
                UPDATE events
                SET name = $2, description = $3, date = $4, location = $5,
                    price = $6, capacity = $7, booked_by = $8, images = $9
                WHERE id = $1
                ",
            )
            .bind(event.id.as_uuid())
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(price_as_i64(event.price)?)
            .bind(capacity_as_i32(event.capacity)?)
            .bind(booked_by_strings(&event))
            .bind(&event.images)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound(format!("event {}", event.id)));
            }
            Ok(())
        })
    }

    fn delete(&self, id: EventId) -> RepoFuture<'_, bool> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn find_booked_by(&self, user: UserId) -> RepoFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM events WHERE $1 = ANY(booked_by) ORDER BY position"
            ))
            .bind(user.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter().map(row_to_event).collect()
        })
    }
}
