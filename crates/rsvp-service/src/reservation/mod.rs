//! Seat reservation: the reserve/cancel protocol and its error taxonomy.

pub mod coordinator;
pub mod error;

pub use coordinator::{Cancellation, ReservationCoordinator};
pub use error::ReservationError;
