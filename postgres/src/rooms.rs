//! `PostgreSQL`-backed room repository.

use crate::db_err;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use stayplan_core::repository::{RepositoryError, RoomRepository};
use stayplan_core::types::{Money, Room, RoomId};
use std::future::Future;
use std::pin::Pin;

type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RepositoryError>> + Send + 'a>>;

const SELECT_COLUMNS: &str = "id, room_type, price_per_night, amenities, is_available, images";

/// Room repository backed by the `rooms` table.
#[derive(Clone)]
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    /// Creates a repository over an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_room(row: &PgRow) -> Result<Room, RepositoryError> {
    let price: i64 = row.try_get("price_per_night").map_err(db_err)?;
    let price = u64::try_from(price)
        .map_err(|_| RepositoryError::Serialization("negative price".to_string()))?;

    Ok(Room {
        id: RoomId::from_uuid(row.try_get("id").map_err(db_err)?),
        room_type: row.try_get("room_type").map_err(db_err)?,
        price_per_night: Money::from_cents(price),
        amenities: row.try_get("amenities").map_err(db_err)?,
        is_available: row.try_get("is_available").map_err(db_err)?,
        images: row.try_get("images").map_err(db_err)?,
    })
}

impl RoomRepository for PostgresRoomRepository {
    fn insert(&self, room: Room) -> RepoFuture<'_, ()> {
        Box::pin(async move {
            let price = i64::try_from(room.price_per_night.cents()).map_err(|_| {
                RepositoryError::Serialization("price exceeds storage range".to_string())
            })?;

            sqlx::query(
                r"
                INSERT INTO rooms (id, room_type, price_per_night, amenities, is_available, images)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(room.id.as_uuid())
            .bind(&room.room_type)
            .bind(price)
            .bind(&room.amenities)
            .bind(room.is_available)
            .bind(&room.images)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
            Ok(())
        })
    }

    fn find(&self, id: RoomId) -> RepoFuture<'_, Option<Room>> {
        Box::pin(async move {
            let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM rooms WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

            row.as_ref().map(row_to_room).transpose()
        })
    }

    fn list(&self) -> RepoFuture<'_, Vec<Room>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM rooms ORDER BY position"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter().map(row_to_room).collect()
        })
    }

    fn list_available(&self) -> RepoFuture<'_, Vec<Room>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM rooms WHERE is_available ORDER BY position"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter().map(row_to_room).collect()
        })
    }
}
