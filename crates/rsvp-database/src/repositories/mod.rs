//! SQL for the PostgreSQL backend.
//!
//! Pool-level repositories (`EventRepository`, `ReservationRepository`)
//! serve reads and collaborator writes. The free functions in [`ledger`]
//! and [`reservation`] run on a transaction's connection and are what the
//! PostgreSQL unit of work is built from.

pub mod event;
pub mod ledger;
pub mod reservation;

pub use event::EventRepository;
pub use reservation::ReservationRepository;

use rsvp_core::error::{AppError, ErrorKind};

/// SQLSTATE for `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE for `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";
/// SQLSTATE for `lock_not_available` (raised when `lock_timeout` expires).
const LOCK_NOT_AVAILABLE: &str = "55P03";
/// SQLSTATE for `query_canceled` (raised when `statement_timeout` expires).
const QUERY_CANCELED: &str = "57014";

/// Map a sqlx error into an [`AppError`], keeping the duplicate-key and
/// retryable conditions distinguishable.
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => ErrorKind::ServiceUnavailable,
            Some(LOCK_NOT_AVAILABLE) | Some(QUERY_CANCELED) => ErrorKind::Timeout,
            _ => ErrorKind::Database,
        },
        sqlx::Error::PoolTimedOut => ErrorKind::Timeout,
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}
