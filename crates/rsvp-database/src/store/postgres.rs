//! PostgreSQL store backend.
//!
//! Each unit of work is one `READ COMMITTED` transaction. Occupancy changes
//! are conditional `UPDATE`s, so the capacity check runs against the latest
//! committed row after the row lock is granted; duplicate reservations are
//! rejected by the `reservations_user_event_unique` index. Row lock waits
//! are bounded by the `lock_timeout` session setting of [`DatabasePool`].

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use rsvp_core::result::AppResult;
use rsvp_core::types::{EventId, UserId};
use rsvp_entity::{Event, EventUpdate, NewEvent, Reservation, SeatLedger};

use crate::connection::DatabasePool;
use crate::repositories::{EventRepository, ReservationRepository, db_error, ledger, reservation};

use super::{
    CapacityLedger, OccupyOutcome, ReleaseOutcome, ReservationRows, ReservationStore, UnitOfWork,
};

/// Reservation store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgReservationStore {
    db: DatabasePool,
    events: EventRepository,
    reservations: ReservationRepository,
}

impl PgReservationStore {
    /// Create a store over the given pool.
    pub fn new(db: DatabasePool) -> Self {
        let events = EventRepository::new(db.pool().clone());
        let reservations = ReservationRepository::new(db.pool().clone());
        Self {
            db,
            events,
            reservations,
        }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn create_event(&self, new_event: NewEvent) -> AppResult<Event> {
        self.events.create(new_event).await
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        self.events.find_by_id(event_id).await
    }

    async fn update_event(
        &self,
        event_id: EventId,
        changes: EventUpdate,
    ) -> AppResult<Option<Event>> {
        self.events.update(event_id, changes).await
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<Option<u64>> {
        self.events.delete(event_id).await
    }

    async fn list_reservations_by_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        self.reservations.find_by_user(user_id).await
    }

    async fn list_reservations_by_event(
        &self,
        event_id: EventId,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.find_by_event(event_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}

/// A PostgreSQL transaction. Dropping it without commit rolls it back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CapacityLedger for PgUnitOfWork {
    async fn capacity_and_occupancy(
        &mut self,
        event_id: EventId,
    ) -> AppResult<Option<SeatLedger>> {
        ledger::find_ledger(&mut *self.tx, event_id).await
    }

    async fn try_occupy_seat(&mut self, event_id: EventId) -> AppResult<OccupyOutcome> {
        if let Some(updated) = ledger::occupy_seat(&mut *self.tx, event_id).await? {
            return Ok(OccupyOutcome::Occupied(updated));
        }

        // The conditional update matched nothing: either the event is full
        // or it does not exist.
        match ledger::find_ledger(&mut *self.tx, event_id).await? {
            Some(current) => Ok(OccupyOutcome::AtCapacity(current)),
            None => Ok(OccupyOutcome::EventMissing),
        }
    }

    async fn release_seat(&mut self, event_id: EventId) -> AppResult<ReleaseOutcome> {
        Ok(match ledger::release_seat(&mut *self.tx, event_id).await? {
            Some(updated) => ReleaseOutcome::Released(updated),
            None => ReleaseOutcome::EventMissing,
        })
    }
}

#[async_trait]
impl ReservationRows for PgUnitOfWork {
    async fn find_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        reservation::find(&mut *self.tx, user_id, event_id).await
    }

    async fn insert_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Reservation> {
        reservation::insert(&mut *self.tx, &Reservation::new(user_id, event_id)).await
    }

    async fn delete_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        if !ledger::lock_event_row(&mut *self.tx, event_id).await? {
            debug!(%event_id, "Deleting reservation for an event that no longer exists");
        }
        reservation::delete(&mut *self.tx, user_id, event_id).await
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let PgUnitOfWork { tx } = *self;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let PgUnitOfWork { tx } = *self;
        tx.rollback()
            .await
            .map_err(|e| db_error("Failed to roll back transaction", e))
    }
}
