//! Event repository implementation.

use sqlx::PgPool;

use rsvp_core::result::AppResult;
use rsvp_core::types::EventId;
use rsvp_entity::{Event, EventUpdate, NewEvent};

use super::db_error;

/// Repository for event rows outside the reservation protocol.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: EventId) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find event", e))
    }

    /// Insert a new event with no seats occupied.
    pub async fn create(&self, new_event: NewEvent) -> AppResult<Event> {
        let event = Event::from_new(new_event);
        sqlx::query_as::<_, Event>(
            "INSERT INTO events \
             (id, creator_id, title, description, location, category, starts_at, \
              capacity, occupied_seats, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9, $10) RETURNING *",
        )
        .bind(event.id)
        .bind(event.creator_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.category)
        .bind(event.starts_at)
        .bind(event.capacity)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create event", e))
    }

    /// Change descriptive fields; absent fields keep their value.
    ///
    /// `capacity` and `occupied_seats` are not in the statement, so this
    /// never races the ledger beyond waiting for the event row lock.
    pub async fn update(&self, id: EventId, changes: EventUpdate) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             location = COALESCE($4, location), \
             category = COALESCE($5, category), \
             starts_at = COALESCE($6, starts_at), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.category)
        .bind(changes.starts_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update event", e))
    }

    /// Delete an event and its reservations in one transaction.
    ///
    /// The event row is locked first so in-flight reserve and cancel units
    /// of work on this event finish before the rows disappear.
    pub async fn delete(&self, id: EventId) -> AppResult<Option<u64>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        if !super::ledger::lock_event_row(&mut *tx, id).await? {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM reservations WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete event reservations", e))?
            .rows_affected();

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete event", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit event deletion", e))?;

        Ok(Some(removed))
    }
}
