//! Capacity ledger primitives.

use async_trait::async_trait;

use rsvp_core::result::AppResult;
use rsvp_core::types::EventId;
use rsvp_entity::SeatLedger;

/// Result of an atomic compare-and-increment on an event's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupyOutcome {
    /// The seat was taken; carries the ledger after the increment.
    Occupied(SeatLedger),
    /// `occupied_seats < capacity` did not hold at write time.
    AtCapacity(SeatLedger),
    /// No event with this id exists.
    EventMissing,
}

/// Result of releasing one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The seat was released; carries the ledger after the decrement.
    Released(SeatLedger),
    /// No event with this id exists.
    EventMissing,
}

/// Per-event capacity and occupancy, as seen from inside a unit of work.
#[async_trait]
pub trait CapacityLedger: Send {
    /// Read capacity and occupancy without locking the event row.
    async fn capacity_and_occupancy(&mut self, event_id: EventId)
    -> AppResult<Option<SeatLedger>>;

    /// Increment `occupied_seats` by one only if it is below `capacity` at
    /// the moment of the write. The check and the increment are a single
    /// atomic step against the store.
    async fn try_occupy_seat(&mut self, event_id: EventId) -> AppResult<OccupyOutcome>;

    /// Decrement `occupied_seats` by one, clamped at zero.
    async fn release_seat(&mut self, event_id: EventId) -> AppResult<ReleaseOutcome>;
}
