//! Transactional store seam for the reservation protocol.
//!
//! A [`UnitOfWork`] is one atomic transaction against the backing store.
//! It exposes the capacity ledger ([`CapacityLedger`]) and the reservation
//! rows ([`ReservationRows`]); every write made through it becomes visible
//! to other units of work only on [`UnitOfWork::commit`], and is discarded
//! on [`UnitOfWork::rollback`] or when the unit of work is dropped.
//!
//! Contention is resolved inside the store (row locks, conditional updates,
//! the `(user_id, event_id)` unique key), never by in-process locks held by
//! callers, so several server instances can share one PostgreSQL store.
//!
//! Both backends lock rows event-first: a unit of work that touches a
//! reservation key locks the owning event row before the key.

pub mod ledger;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use rsvp_core::result::AppResult;
use rsvp_core::types::{EventId, UserId};
use rsvp_entity::{Event, EventUpdate, NewEvent, Reservation};

pub use ledger::{CapacityLedger, OccupyOutcome, ReleaseOutcome};
pub use memory::MemoryReservationStore;
pub use postgres::PgReservationStore;

/// Reservation rows as seen from inside a unit of work.
#[async_trait]
pub trait ReservationRows: Send {
    /// Find the committed (or own-uncommitted) reservation for the pair.
    async fn find_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>>;

    /// Insert a reservation row for the pair.
    ///
    /// A row that already exists for the pair is rejected with
    /// [`rsvp_core::ErrorKind::Conflict`], the duplicate-key signal.
    async fn insert_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Reservation>;

    /// Find and delete the reservation for the pair in one step.
    async fn delete_reservation(
        &mut self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>>;
}

/// One atomic transaction over the ledger and the reservation rows.
#[async_trait]
pub trait UnitOfWork: CapacityLedger + ReservationRows {
    /// Make every write of this unit of work visible atomically.
    ///
    /// A duplicate key detected at commit time surfaces as
    /// [`rsvp_core::ErrorKind::Conflict`]. On any error nothing is applied.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this unit of work.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// A transactional store holding events and reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync + std::fmt::Debug {
    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Insert a new event with no seats occupied.
    async fn create_event(&self, new_event: NewEvent) -> AppResult<Event>;

    /// Load a committed event.
    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>>;

    /// Change descriptive fields of an event. Capacity and occupancy are
    /// never touched. Returns `None` if the event does not exist.
    async fn update_event(&self, event_id: EventId, changes: EventUpdate)
    -> AppResult<Option<Event>>;

    /// Delete an event together with all of its reservations.
    ///
    /// Returns the number of reservations removed, or `None` if the event
    /// did not exist.
    async fn delete_event(&self, event_id: EventId) -> AppResult<Option<u64>>;

    /// List reservations held by a user, newest first.
    async fn list_reservations_by_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;

    /// List reservations for an event, oldest first.
    async fn list_reservations_by_event(&self, event_id: EventId)
    -> AppResult<Vec<Reservation>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
