//! Reserve and cancel, each as one unit of work against the store.
//!
//! The coordinator holds no locks of its own. Contention is settled by the
//! store: the conditional occupancy increment decides the last seat, and the
//! `(user_id, event_id)` unique key decides same-pair races. A same-pair
//! loser that finds the event full is re-checked for the winner's row and
//! reported as `AlreadyReserved`. A failed or timed-out call leaves no
//! partial effect.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use rsvp_core::config::ReservationConfig;
use rsvp_core::error::AppError;
use rsvp_core::types::{EventId, UserId};
use rsvp_database::{
    CapacityLedger, OccupyOutcome, ReleaseOutcome, ReservationRows, ReservationStore, UnitOfWork,
};
use rsvp_entity::{Reservation, SeatLedger};

use super::error::ReservationError;

/// A committed cancellation.
#[derive(Debug, Clone)]
pub struct Cancellation {
    /// The reservation that was removed.
    pub reservation: Reservation,
    /// Occupancy after the seat was released, or `None` if the event no
    /// longer exists.
    pub occupied_seats: Option<i32>,
}

/// Runs the reservation protocol.
#[derive(Debug, Clone)]
pub struct ReservationCoordinator {
    /// Transactional store.
    store: Arc<dyn ReservationStore>,
    /// Deadline for one reserve or cancel call.
    operation_timeout: Duration,
}

impl ReservationCoordinator {
    /// Creates a new coordinator.
    pub fn new(store: Arc<dyn ReservationStore>, config: &ReservationConfig) -> Self {
        Self {
            store,
            operation_timeout: config.operation_timeout(),
        }
    }

    /// Grants `user_id` one seat at `event_id`.
    #[instrument(skip_all, fields(%user_id, %event_id))]
    pub async fn reserve(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Reservation, ReservationError> {
        let result = self
            .with_deadline("reserve", self.reserve_once(user_id, event_id))
            .await;

        match &result {
            Ok(reservation) => {
                info!(reservation_id = %reservation.id, "Seat reserved");
            }
            Err(ReservationError::Transient(err)) => {
                warn!(error = %err, "Reserve failed transiently");
            }
            Err(outcome) => {
                debug!(%outcome, "Reserve rejected");
            }
        }
        result
    }

    /// Removes the reservation of `user_id` at `event_id` and frees its seat.
    #[instrument(skip_all, fields(%user_id, %event_id))]
    pub async fn cancel(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Cancellation, ReservationError> {
        let result = self
            .with_deadline("cancel", self.cancel_once(user_id, event_id))
            .await;

        match &result {
            Ok(cancellation) => {
                info!(
                    reservation_id = %cancellation.reservation.id,
                    occupied_seats = ?cancellation.occupied_seats,
                    "Reservation cancelled"
                );
            }
            Err(ReservationError::Transient(err)) => {
                warn!(error = %err, "Cancel failed transiently");
            }
            Err(outcome) => {
                debug!(%outcome, "Cancel rejected");
            }
        }
        result
    }

    /// Bound `operation` by the configured deadline. On expiry the future is
    /// dropped together with its unit of work, which rolls it back.
    async fn with_deadline<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, ReservationError>>,
    ) -> Result<T, ReservationError> {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ReservationError::Transient(AppError::timeout(format!(
                "{operation} exceeded {} ms",
                self.operation_timeout.as_millis()
            )))),
        }
    }

    async fn reserve_once(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Reservation, ReservationError> {
        let mut uow = self.store.begin().await?;

        match reserve_in(uow.as_mut(), user_id, event_id).await {
            Ok(reservation) => {
                uow.commit().await.map_err(ReservationError::from_write)?;
                Ok(reservation)
            }
            Err(err) => {
                rollback(uow).await;
                Err(err)
            }
        }
    }

    async fn cancel_once(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<Cancellation, ReservationError> {
        let mut uow = self.store.begin().await?;

        match cancel_in(uow.as_mut(), user_id, event_id).await {
            Ok(cancellation) => {
                uow.commit().await?;
                Ok(cancellation)
            }
            Err(err) => {
                rollback(uow).await;
                Err(err)
            }
        }
    }
}

async fn reserve_in(
    uow: &mut dyn UnitOfWork,
    user_id: UserId,
    event_id: EventId,
) -> Result<Reservation, ReservationError> {
    let ledger = uow
        .capacity_and_occupancy(event_id)
        .await?
        .ok_or(ReservationError::EventNotFound)?;
    check_ledger(&ledger)?;

    if uow.find_reservation(user_id, event_id).await?.is_some() {
        return Err(ReservationError::AlreadyReserved);
    }

    match uow.try_occupy_seat(event_id).await? {
        OccupyOutcome::Occupied(after) => {
            debug!(
                occupied_seats = after.occupied_seats,
                capacity = after.capacity,
                "Seat occupied"
            );
        }
        OccupyOutcome::AtCapacity(_) => {
            // Whoever took the last seat committed before our write saw the
            // row, so a same-pair reservation that raced us is visible now.
            if uow.find_reservation(user_id, event_id).await?.is_some() {
                return Err(ReservationError::AlreadyReserved);
            }
            return Err(ReservationError::EventFull);
        }
        OccupyOutcome::EventMissing => return Err(ReservationError::EventNotFound),
    }

    uow.insert_reservation(user_id, event_id)
        .await
        .map_err(ReservationError::from_write)
}

async fn cancel_in(
    uow: &mut dyn UnitOfWork,
    user_id: UserId,
    event_id: EventId,
) -> Result<Cancellation, ReservationError> {
    let reservation = uow
        .delete_reservation(user_id, event_id)
        .await?
        .ok_or(ReservationError::ReservationNotFound)?;

    let occupied_seats = match uow.release_seat(event_id).await? {
        ReleaseOutcome::Released(after) => Some(after.occupied_seats),
        ReleaseOutcome::EventMissing => {
            debug!("Event no longer exists, nothing to release");
            None
        }
    };

    Ok(Cancellation {
        reservation,
        occupied_seats,
    })
}

/// Reject a ledger that breaks `0 <= occupied_seats <= capacity`. Such an
/// event is treated as full and never grants a seat.
fn check_ledger(ledger: &SeatLedger) -> Result<(), ReservationError> {
    if ledger.is_consistent() {
        return Ok(());
    }
    warn!(
        event_id = %ledger.event_id,
        capacity = ledger.capacity,
        occupied_seats = ledger.occupied_seats,
        "Inconsistent seat ledger, refusing new reservations"
    );
    Err(ReservationError::EventFull)
}

async fn rollback(uow: Box<dyn UnitOfWork>) {
    if let Err(err) = uow.rollback().await {
        warn!(error = %err, "Rollback failed, unit of work discarded");
    }
}
