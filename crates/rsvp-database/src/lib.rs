//! # rsvp-database
//!
//! Storage for the capacity ledger and reservation rows.
//!
//! [`store`] defines the transactional seam the reservation coordinator runs
//! against and provides two backends: PostgreSQL (shared across server
//! instances) and an in-process store for single-node development and
//! tests. [`repositories`] holds the SQL used by the PostgreSQL backend.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    CapacityLedger, MemoryReservationStore, OccupyOutcome, PgReservationStore, ReleaseOutcome,
    ReservationRows, ReservationStore, UnitOfWork,
};
