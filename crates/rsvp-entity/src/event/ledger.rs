//! Per-event capacity ledger snapshot.

use serde::{Deserialize, Serialize};

use rsvp_core::types::EventId;

/// Capacity and occupied-seat count of one event, as read inside a unit of work.
///
/// Committed states always satisfy `0 <= occupied_seats <= capacity`; the
/// accessors below stay well-defined even when a row violates that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SeatLedger {
    /// Event the ledger belongs to.
    #[sqlx(rename = "id")]
    pub event_id: EventId,
    /// Total seats.
    pub capacity: i32,
    /// Seats held by committed reservations.
    pub occupied_seats: i32,
}

impl SeatLedger {
    /// Seats still open for reservation, never negative.
    pub fn available_seats(&self) -> i32 {
        (self.capacity - self.occupied_seats).max(0)
    }

    /// Whether no further seat can be granted.
    pub fn is_full(&self) -> bool {
        self.available_seats() == 0
    }

    /// Whether the ledger satisfies `0 <= occupied_seats <= capacity`.
    pub fn is_consistent(&self) -> bool {
        self.capacity >= 1 && (0..=self.capacity).contains(&self.occupied_seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(capacity: i32, occupied_seats: i32) -> SeatLedger {
        SeatLedger {
            event_id: EventId::new(),
            capacity,
            occupied_seats,
        }
    }

    #[test]
    fn test_available_seats() {
        assert_eq!(ledger(3, 1).available_seats(), 2);
        assert!(!ledger(3, 2).is_full());
        assert!(ledger(3, 3).is_full());
    }

    #[test]
    fn test_overbooked_ledger_reads_as_full() {
        let l = ledger(2, 5);
        assert_eq!(l.available_seats(), 0);
        assert!(l.is_full());
        assert!(!l.is_consistent());
    }

    #[test]
    fn test_negative_occupancy_is_inconsistent() {
        assert!(!ledger(2, -1).is_consistent());
        assert!(ledger(2, 0).is_consistent());
    }
}
