//! # rsvp-service
//!
//! Business logic for the RSVP service. The [`ReservationCoordinator`] runs
//! the reserve and cancel protocols as single units of work against a
//! [`rsvp_database::ReservationStore`]; the [`EventService`] covers the
//! event lifecycle and reservation listings around it.
//!
//! Services take their store as an `Arc<dyn ReservationStore>` at
//! construction time.

pub mod event;
pub mod reservation;

pub use event::EventService;
pub use reservation::{Cancellation, ReservationCoordinator, ReservationError};
