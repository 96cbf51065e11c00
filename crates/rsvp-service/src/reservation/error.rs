//! Outcomes of the reserve and cancel protocols that are not a success.

use thiserror::Error;

use rsvp_core::error::AppError;

/// Why a reserve or cancel did not take effect.
///
/// Every variant except [`ReservationError::Transient`] is a terminal
/// business outcome. A transient failure left no partial effect behind and
/// the same call may be issued again.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The event does not exist.
    #[error("Event not found")]
    EventNotFound,

    /// The caller has no reservation for the event.
    #[error("Reservation not found")]
    ReservationNotFound,

    /// The caller already holds a seat for the event.
    #[error("You have already reserved a seat for this event")]
    AlreadyReserved,

    /// Every seat is taken.
    #[error("Event is at full capacity")]
    EventFull,

    /// The store failed, timed out, or was unavailable.
    #[error("Reservation could not be completed, please retry: {0}")]
    Transient(#[source] AppError),
}

impl ReservationError {
    /// Whether re-issuing the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Classify a store error raised by a reservation insert or a commit.
    ///
    /// A duplicate key means a concurrent unit of work committed the same
    /// `(user_id, event_id)` pair first.
    pub fn from_write(err: AppError) -> Self {
        if err.is_conflict() {
            Self::AlreadyReserved
        } else {
            Self::Transient(err)
        }
    }
}

impl From<AppError> for ReservationError {
    fn from(err: AppError) -> Self {
        Self::Transient(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(ReservationError::Transient(AppError::timeout("lock wait")).is_retryable());
        assert!(!ReservationError::EventNotFound.is_retryable());
        assert!(!ReservationError::ReservationNotFound.is_retryable());
        assert!(!ReservationError::AlreadyReserved.is_retryable());
        assert!(!ReservationError::EventFull.is_retryable());
    }

    #[test]
    fn test_duplicate_key_on_write_is_already_reserved() {
        let err = ReservationError::from_write(AppError::conflict("duplicate key"));
        assert!(matches!(err, ReservationError::AlreadyReserved));

        let err = ReservationError::from_write(AppError::service_unavailable("deadlock"));
        assert!(matches!(err, ReservationError::Transient(_)));
    }

    #[test]
    fn test_store_errors_convert_to_transient() {
        let err: ReservationError = AppError::database("connection reset").into();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("connection reset"));
    }
}
