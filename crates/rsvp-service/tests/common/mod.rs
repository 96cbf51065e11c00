//! Shared helpers for coordinator tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use rsvp_core::config::ReservationConfig;
use rsvp_core::error::AppError;
use rsvp_core::result::AppResult;
use rsvp_core::types::{EventId, UserId};
use rsvp_database::{
    CapacityLedger, MemoryReservationStore, OccupyOutcome, ReleaseOutcome, ReservationRows,
    ReservationStore, UnitOfWork,
};
use rsvp_entity::{Event, EventUpdate, NewEvent, Reservation, SeatLedger};
use rsvp_service::{EventService, ReservationCoordinator};

/// Coordinator, event service, and the memory store behind them.
pub struct Harness {
    pub store: MemoryReservationStore,
    pub coordinator: ReservationCoordinator,
    pub events: EventService,
    config: ReservationConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ReservationConfig::default())
    }

    pub fn with_config(config: ReservationConfig) -> Self {
        let store = MemoryReservationStore::new(config.lock_timeout());
        let shared: Arc<dyn ReservationStore> = Arc::new(store.clone());
        Self {
            coordinator: ReservationCoordinator::new(shared.clone(), &config),
            events: EventService::new(shared),
            store,
            config,
        }
    }

    /// A coordinator over the same store with `fault` injected into every unit of work.
    pub fn faulty_coordinator(&self, fault: Fault) -> ReservationCoordinator {
        let store = FaultyStore {
            inner: self.store.clone(),
            fault,
        };
        ReservationCoordinator::new(Arc::new(store), &self.config)
    }

    pub async fn event(&self, capacity: i32) -> Event {
        self.events
            .create_event(NewEvent::new(UserId::new(), "Rust meetup", capacity))
            .await
            .unwrap()
    }

    pub async fn occupied(&self, event_id: EventId) -> i32 {
        self.store.ledger(event_id).await.unwrap().occupied_seats
    }
}

/// Where a [`FaultyStore`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `insert_reservation` fails with a database error.
    Insert,
    /// `commit` rolls back and fails with a database error.
    Commit,
    /// `commit` rolls back and reports a duplicate key.
    CommitConflict,
    /// `release_seat` finds the event already deleted.
    EventGone,
    /// `find_reservation` answers only after the given delay, like a slow
    /// database round trip.
    SlowLookup(Duration),
}

/// Memory store wrapper that injects failures into its units of work.
#[derive(Debug, Clone)]
pub struct FaultyStore {
    inner: MemoryReservationStore,
    fault: Fault,
}

#[async_trait]
impl ReservationStore for FaultyStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(FaultyUnitOfWork {
            inner: self.inner.begin().await?,
            fault: self.fault,
        }))
    }

    async fn create_event(&self, new_event: NewEvent) -> AppResult<Event> {
        self.inner.create_event(new_event).await
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        self.inner.find_event(event_id).await
    }

    async fn update_event(
        &self,
        event_id: EventId,
        changes: EventUpdate,
    ) -> AppResult<Option<Event>> {
        self.inner.update_event(event_id, changes).await
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<Option<u64>> {
        self.inner.delete_event(event_id).await
    }

    async fn list_reservations_by_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        self.inner.list_reservations_by_user(user_id).await
    }

    async fn list_reservations_by_event(
        &self,
        event_id: EventId,
    ) -> AppResult<Vec<Reservation>> {
        self.inner.list_reservations_by_event(event_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

struct FaultyUnitOfWork {
    inner: Box<dyn UnitOfWork>,
    fault: Fault,
}

#[async_trait]
impl CapacityLedger for FaultyUnitOfWork {
    async fn capacity_and_occupancy(
        &mut self,
        event_id: EventId,
    ) -> AppResult<Option<SeatLedger>> {
        self.inner.capacity_and_occupancy(event_id).await
    }

    async fn try_occupy_seat(&mut self, event_id: EventId) -> AppResult<OccupyOutcome> {
        self.inner.try_occupy_seat(event_id).await
    }

    async fn release_seat(&mut self, event_id: EventId) -> AppResult<ReleaseOutcome> {
        if self.fault == Fault::EventGone {
            return Ok(ReleaseOutcome::EventMissing);
        }
        self.inner.release_seat(event_id).await
    }
}

#[async_trait]
impl ReservationRows for FaultyUnitOfWork {
    async fn find_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        let found = self.inner.find_reservation(user_id, event_id).await;
        if let Fault::SlowLookup(delay) = self.fault {
            tokio::time::sleep(delay).await;
        }
        found
    }

    async fn insert_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Reservation> {
        if self.fault == Fault::Insert {
            return Err(AppError::database("injected insert failure"));
        }
        self.inner.insert_reservation(user_id, event_id).await
    }

    async fn delete_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        self.inner.delete_reservation(user_id, event_id).await
    }
}

#[async_trait]
impl UnitOfWork for FaultyUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let FaultyUnitOfWork { inner, fault } = *self;
        match fault {
            Fault::Insert | Fault::EventGone | Fault::SlowLookup(_) => inner.commit().await,
            Fault::Commit => {
                inner.rollback().await?;
                Err(AppError::database("injected commit failure"))
            }
            Fault::CommitConflict => {
                inner.rollback().await?;
                Err(AppError::conflict("injected duplicate key"))
            }
        }
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.inner.rollback().await
    }
}

/// Config with short deadlines for timeout tests.
pub fn short_deadlines(operation_ms: u64, lock_ms: u64) -> ReservationConfig {
    ReservationConfig {
        operation_timeout_ms: operation_ms,
        lock_timeout_ms: lock_ms,
    }
}

/// Deadlines generous enough for heavily contended tests.
pub fn contended() -> ReservationConfig {
    short_deadlines(30_000, 10_000)
}
