//! `PostgreSQL` repositories for Stayplan.
//!
//! This crate provides production implementations of the repository traits
//! from `stayplan-core`. It uses sqlx with runtime-checked queries and
//! supports:
//!
//! - Document-per-row storage for events and rooms
//! - Insertion-order listing via a serial position column
//! - Atomic full-document replace (one `UPDATE` per write)
//! - Connection pooling
//!
//! # Example
//!
//! ```ignore
//! use stayplan_postgres::{connect, ensure_schema, PostgresEventRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = connect("postgres://localhost/stayplan", 10).await?;
//!     ensure_schema(&pool).await?;
//!     let events = PostgresEventRepository::new(pool);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod rooms;

pub use events::PostgresEventRepository;
pub use rooms::PostgresRoomRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use stayplan_core::repository::RepositoryError;

/// Open a connection pool against the given database URL.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the pool cannot be created.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, RepositoryError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))
}

/// Create the events and rooms tables if they do not exist.
///
/// Idempotent; safe to run on every startup.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if a DDL statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            date TIMESTAMPTZ NOT NULL,
            location TEXT NOT NULL,
            price BIGINT NOT NULL CHECK (price >= 0),
            capacity INTEGER NOT NULL CHECK (capacity >= 1),
            booked_by TEXT[] NOT NULL DEFAULT '{}',
            images TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            position BIGSERIAL
        )
        ",
    )
    .execute(pool)
    .await
    .map_err(|e| RepositoryError::Database(e.to_string()))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_booked_by ON events USING GIN (booked_by)")
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS rooms (
            id UUID PRIMARY KEY,
            room_type TEXT NOT NULL,
            price_per_night BIGINT NOT NULL CHECK (price_per_night >= 0),
            amenities TEXT[] NOT NULL DEFAULT '{}',
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            images TEXT[] NOT NULL DEFAULT '{}',
            position BIGSERIAL
        )
        ",
    )
    .execute(pool)
    .await
    .map_err(|e| RepositoryError::Database(e.to_string()))?;

    tracing::debug!("Database schema ensured");
    Ok(())
}

/// Map a sqlx error to a repository error.
pub(crate) fn db_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(err.to_string())
}
