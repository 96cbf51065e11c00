//! In-process store backend for single-node deployments and tests.
//!
//! Behaves like a `READ COMMITTED` database with row locks:
//! - committed rows live in [`Tables`] behind a short latch that is never
//!   held across a lock wait;
//! - a unit of work takes per-row locks (the event row, the reservation
//!   key) and keeps them until commit or rollback;
//! - writes are buffered in the unit of work and applied under the latch on
//!   commit, so other units of work never observe them half-applied;
//! - reads that do not lock see committed rows plus the unit of work's own
//!   buffered writes.
//!
//! Lock waits are bounded by the configured lock timeout and fail with
//! [`ErrorKind::Timeout`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use rsvp_core::error::{AppError, ErrorKind};
use rsvp_core::result::AppResult;
use rsvp_core::types::{EventId, UserId};
use rsvp_entity::{Event, EventUpdate, NewEvent, Reservation, SeatLedger};

use super::{
    CapacityLedger, OccupyOutcome, ReleaseOutcome, ReservationRows, ReservationStore, UnitOfWork,
};

type ReservationKey = (UserId, EventId);

/// A lockable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RowKey {
    Event(EventId),
    Reservation(UserId, EventId),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(event_id) => write!(f, "event {event_id}"),
            Self::Reservation(user_id, event_id) => {
                write!(f, "reservation ({user_id}, {event_id})")
            }
        }
    }
}

type LockTable = DashMap<RowKey, Arc<Mutex<()>>>;

/// Committed state.
#[derive(Debug, Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    reservations: HashMap<ReservationKey, Reservation>,
}

/// In-process reservation store.
#[derive(Debug, Clone)]
pub struct MemoryReservationStore {
    tables: Arc<Mutex<Tables>>,
    locks: Arc<LockTable>,
    lock_timeout: Duration,
}

impl MemoryReservationStore {
    /// Creates an empty store whose row lock waits give up after `lock_timeout`.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            locks: Arc::new(DashMap::new()),
            lock_timeout,
        }
    }

    /// Committed ledger of an event.
    pub async fn ledger(&self, event_id: EventId) -> Option<SeatLedger> {
        let tables = self.tables.lock().await;
        tables.events.get(&event_id).map(Event::ledger)
    }

    /// Number of committed reservations for an event.
    pub async fn reservation_count(&self, event_id: EventId) -> usize {
        let tables = self.tables.lock().await;
        tables
            .reservations
            .keys()
            .filter(|(_, e)| *e == event_id)
            .count()
    }
}

impl Default for MemoryReservationStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

/// Wait for a row lock, bounded by `timeout`.
async fn acquire_row(
    locks: &LockTable,
    key: RowKey,
    timeout: Duration,
) -> AppResult<OwnedMutexGuard<()>> {
    let row = locks.entry(key).or_default().clone();
    tokio::time::timeout(timeout, row.lock_owned())
        .await
        .map_err(|_| AppError::timeout(format!("Timed out waiting for lock on {key}")))
}

/// Release a row lock and forget the lock entry once nobody else refers to it.
fn release_row(locks: &LockTable, key: RowKey, guard: OwnedMutexGuard<()>) {
    drop(guard);
    locks.remove_if(&key, |_, row| Arc::strong_count(row) == 1);
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            tables: Arc::clone(&self.tables),
            locks: Arc::clone(&self.locks),
            lock_timeout: self.lock_timeout,
            held: Vec::new(),
            seat_writes: HashMap::new(),
            inserted: HashMap::new(),
            deleted: HashSet::new(),
        }))
    }

    async fn create_event(&self, new_event: NewEvent) -> AppResult<Event> {
        let event = Event::from_new(new_event);
        let mut tables = self.tables.lock().await;
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let tables = self.tables.lock().await;
        Ok(tables.events.get(&event_id).cloned())
    }

    async fn update_event(
        &self,
        event_id: EventId,
        changes: EventUpdate,
    ) -> AppResult<Option<Event>> {
        let key = RowKey::Event(event_id);
        let guard = acquire_row(&self.locks, key, self.lock_timeout).await?;

        let updated = {
            let mut tables = self.tables.lock().await;
            tables.events.get_mut(&event_id).map(|event| {
                event.apply(changes);
                event.clone()
            })
        };

        release_row(&self.locks, key, guard);
        Ok(updated)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<Option<u64>> {
        let key = RowKey::Event(event_id);
        let guard = acquire_row(&self.locks, key, self.lock_timeout).await?;

        let removed = {
            let mut tables = self.tables.lock().await;
            match tables.events.remove(&event_id) {
                Some(_) => {
                    let before = tables.reservations.len();
                    tables.reservations.retain(|(_, e), _| *e != event_id);
                    Some((before - tables.reservations.len()) as u64)
                }
                None => None,
            }
        };

        release_row(&self.locks, key, guard);
        Ok(removed)
    }

    async fn list_reservations_by_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Reservation> = tables
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_reservations_by_event(
        &self,
        event_id: EventId,
    ) -> AppResult<Vec<Reservation>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Reservation> = tables
            .reservations
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// A buffered transaction over [`MemoryReservationStore`].
///
/// Dropping it without commit discards the buffers and releases its locks.
pub struct MemoryUnitOfWork {
    tables: Arc<Mutex<Tables>>,
    locks: Arc<LockTable>,
    lock_timeout: Duration,
    held: Vec<(RowKey, OwnedMutexGuard<()>)>,
    seat_writes: HashMap<EventId, i32>,
    inserted: HashMap<ReservationKey, Reservation>,
    deleted: HashSet<ReservationKey>,
}

impl MemoryUnitOfWork {
    /// Take a row lock unless this unit of work already holds it.
    async fn lock(&mut self, key: RowKey) -> AppResult<()> {
        if self.held.iter().any(|(held, _)| *held == key) {
            return Ok(());
        }
        let guard = acquire_row(&self.locks, key, self.lock_timeout).await?;
        self.held.push((key, guard));
        Ok(())
    }

    /// Committed ledger overlaid with this unit of work's pending seat write.
    async fn visible_ledger(&self, event_id: EventId) -> Option<SeatLedger> {
        let tables = self.tables.lock().await;
        tables.events.get(&event_id).map(|event| {
            let mut ledger = event.ledger();
            if let Some(occupied) = self.seat_writes.get(&event_id) {
                ledger.occupied_seats = *occupied;
            }
            ledger
        })
    }

    /// Committed reservation overlaid with this unit of work's pending insert/delete.
    async fn visible_reservation(&self, key: ReservationKey) -> Option<Reservation> {
        if let Some(row) = self.inserted.get(&key) {
            return Some(row.clone());
        }
        if self.deleted.contains(&key) {
            return None;
        }
        let tables = self.tables.lock().await;
        tables.reservations.get(&key).cloned()
    }
}

#[async_trait]
impl CapacityLedger for MemoryUnitOfWork {
    async fn capacity_and_occupancy(
        &mut self,
        event_id: EventId,
    ) -> AppResult<Option<SeatLedger>> {
        Ok(self.visible_ledger(event_id).await)
    }

    async fn try_occupy_seat(&mut self, event_id: EventId) -> AppResult<OccupyOutcome> {
        self.lock(RowKey::Event(event_id)).await?;

        // The row lock is held from here to commit, so the read below and
        // the buffered write form one compare-and-increment.
        let Some(mut ledger) = self.visible_ledger(event_id).await else {
            return Ok(OccupyOutcome::EventMissing);
        };
        if ledger.occupied_seats >= ledger.capacity {
            return Ok(OccupyOutcome::AtCapacity(ledger));
        }

        ledger.occupied_seats += 1;
        self.seat_writes.insert(event_id, ledger.occupied_seats);
        Ok(OccupyOutcome::Occupied(ledger))
    }

    async fn release_seat(&mut self, event_id: EventId) -> AppResult<ReleaseOutcome> {
        self.lock(RowKey::Event(event_id)).await?;

        let Some(mut ledger) = self.visible_ledger(event_id).await else {
            return Ok(ReleaseOutcome::EventMissing);
        };

        ledger.occupied_seats = (ledger.occupied_seats - 1).max(0);
        self.seat_writes.insert(event_id, ledger.occupied_seats);
        Ok(ReleaseOutcome::Released(ledger))
    }
}

#[async_trait]
impl ReservationRows for MemoryUnitOfWork {
    async fn find_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        Ok(self.visible_reservation((user_id, event_id)).await)
    }

    async fn insert_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Reservation> {
        self.lock(RowKey::Event(event_id)).await?;
        self.lock(RowKey::Reservation(user_id, event_id)).await?;

        if self.visible_ledger(event_id).await.is_none() {
            return Err(AppError::database(format!(
                "Reservation references missing event {event_id}"
            )));
        }
        if self.visible_reservation((user_id, event_id)).await.is_some() {
            return Err(AppError::conflict(format!(
                "Duplicate reservation for user {user_id} on event {event_id}"
            )));
        }

        let row = Reservation::new(user_id, event_id);
        self.inserted.insert(row.key(), row.clone());
        Ok(row)
    }

    async fn delete_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        self.lock(RowKey::Event(event_id)).await?;
        self.lock(RowKey::Reservation(user_id, event_id)).await?;

        let key = (user_id, event_id);
        let Some(row) = self.visible_reservation(key).await else {
            return Ok(None);
        };

        if self.inserted.remove(&key).is_none() {
            self.deleted.insert(key);
        }
        Ok(Some(row))
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut this = *self;
        let tables = Arc::clone(&this.tables);
        let mut tables = tables.lock().await;

        for (event_id, occupied) in &this.seat_writes {
            if let Some(event) = tables.events.get(event_id) {
                if !(0..=event.capacity).contains(occupied) {
                    return Err(AppError::new(
                        ErrorKind::Internal,
                        format!(
                            "Occupancy {occupied} outside 0..={} for event {event_id}",
                            event.capacity
                        ),
                    ));
                }
            }
        }

        for (event_id, occupied) in this.seat_writes.drain() {
            if let Some(event) = tables.events.get_mut(&event_id) {
                event.occupied_seats = occupied;
            }
        }
        for key in this.deleted.drain() {
            tables.reservations.remove(&key);
        }
        for (key, row) in this.inserted.drain() {
            tables.reservations.insert(key, row);
        }

        debug!(locks = this.held.len(), "Unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        for (key, guard) in self.held.drain(..) {
            release_row(&self.locks, key, guard);
        }
    }
}
