//! Reservation domain entities.

pub mod model;

pub use model::Reservation;
