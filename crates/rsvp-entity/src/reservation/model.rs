//! Reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rsvp_core::types::{EventId, ReservationId, UserId};

/// A committed seat grant linking one user to one event.
///
/// At most one row exists per `(user_id, event_id)`; the storage layer
/// enforces this with a unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: ReservationId,
    /// User holding the seat.
    pub user_id: UserId,
    /// Event the seat belongs to.
    pub event_id: EventId,
    /// When the reservation was committed.
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Build a new reservation row for the pair, stamped now.
    pub fn new(user_id: UserId, event_id: EventId) -> Self {
        Self {
            id: ReservationId::new(),
            user_id,
            event_id,
            created_at: Utc::now(),
        }
    }

    /// The uniqueness key of this reservation.
    pub fn key(&self) -> (UserId, EventId) {
        (self.user_id, self.event_id)
    }
}
