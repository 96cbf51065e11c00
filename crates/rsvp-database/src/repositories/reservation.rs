//! Reservation repository and transaction-scoped reservation queries.

use sqlx::{PgConnection, PgPool};

use rsvp_core::result::AppResult;
use rsvp_core::types::{EventId, UserId};
use rsvp_entity::Reservation;

use super::db_error;

/// Read-side repository for reservation rows.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List reservations held by a user, newest first.
    pub async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list user reservations", e))
    }

    /// List reservations for an event, oldest first.
    pub async fn find_by_event(&self, event_id: EventId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE event_id = $1 ORDER BY created_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list event reservations", e))
    }
}

/// Find the reservation for a pair.
pub async fn find(
    conn: &mut PgConnection,
    user_id: UserId,
    event_id: EventId,
) -> AppResult<Option<Reservation>> {
    sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE user_id = $1 AND event_id = $2",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| db_error("Failed to find reservation", e))
}

/// Insert a reservation row. A duplicate pair fails with `ErrorKind::Conflict`.
pub async fn insert(conn: &mut PgConnection, reservation: &Reservation) -> AppResult<Reservation> {
    sqlx::query_as::<_, Reservation>(
        "INSERT INTO reservations (id, user_id, event_id, created_at) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(reservation.id)
    .bind(reservation.user_id)
    .bind(reservation.event_id)
    .bind(reservation.created_at)
    .fetch_one(conn)
    .await
    .map_err(|e| db_error("Failed to insert reservation", e))
}

/// Delete the reservation for a pair, returning the deleted row.
pub async fn delete(
    conn: &mut PgConnection,
    user_id: UserId,
    event_id: EventId,
) -> AppResult<Option<Reservation>> {
    sqlx::query_as::<_, Reservation>(
        "DELETE FROM reservations WHERE user_id = $1 AND event_id = $2 RETURNING *",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| db_error("Failed to delete reservation", e))
}
