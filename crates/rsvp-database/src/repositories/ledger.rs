//! Capacity ledger queries. Each runs on a transaction's connection.

use sqlx::PgConnection;

use rsvp_core::result::AppResult;
use rsvp_core::types::EventId;
use rsvp_entity::SeatLedger;

use super::db_error;

/// Read capacity and occupancy for an event.
pub async fn find_ledger(conn: &mut PgConnection, event_id: EventId) -> AppResult<Option<SeatLedger>> {
    sqlx::query_as::<_, SeatLedger>("SELECT id, capacity, occupied_seats FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| db_error("Failed to load event ledger", e))
}

/// Take the event row lock without changing it.
///
/// Returns `false` if the event does not exist.
pub async fn lock_event_row(conn: &mut PgConnection, event_id: EventId) -> AppResult<bool> {
    sqlx::query_scalar::<_, i32>("SELECT 1 FROM events WHERE id = $1 FOR NO KEY UPDATE")
        .bind(event_id)
        .fetch_optional(conn)
        .await
        .map(|row| row.is_some())
        .map_err(|e| db_error("Failed to lock event row", e))
}

/// Conditionally increment `occupied_seats`.
///
/// The `occupied_seats < capacity` predicate is evaluated by PostgreSQL
/// against the latest committed row version after the row lock is granted,
/// so concurrent callers cannot both take the last seat. Returns `None`
/// when the predicate fails or the event does not exist.
pub async fn occupy_seat(conn: &mut PgConnection, event_id: EventId) -> AppResult<Option<SeatLedger>> {
    sqlx::query_as::<_, SeatLedger>(
        "UPDATE events SET occupied_seats = occupied_seats + 1 \
         WHERE id = $1 AND occupied_seats < capacity \
         RETURNING id, capacity, occupied_seats",
    )
    .bind(event_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| db_error("Failed to occupy seat", e))
}

/// Decrement `occupied_seats`, clamped at zero.
///
/// Returns `None` when the event does not exist.
pub async fn release_seat(conn: &mut PgConnection, event_id: EventId) -> AppResult<Option<SeatLedger>> {
    sqlx::query_as::<_, SeatLedger>(
        "UPDATE events SET occupied_seats = GREATEST(occupied_seats - 1, 0) \
         WHERE id = $1 \
         RETURNING id, capacity, occupied_seats",
    )
    .bind(event_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| db_error("Failed to release seat", e))
}
