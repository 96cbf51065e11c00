//! # rsvp-entity
//!
//! Domain entity models for the RSVP reservation service. Database entities
//! derive `sqlx::FromRow`; value objects such as [`event::SeatLedger`] are
//! computed from them.

pub mod event;
pub mod reservation;

pub use event::{Event, EventCategory, EventUpdate, NewEvent, SeatLedger};
pub use reservation::Reservation;
