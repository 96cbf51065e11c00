//! Reserve, cancel, and list-my-reservations handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, CancellationResponse, ReservationResponse};
use crate::error::ApiError;
use crate::extractors::{Caller, parse_event_id};
use crate::state::AppState;

/// POST /api/events/{id}/rsvp
pub async fn reserve(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationResponse>>), ApiError> {
    let event_id = parse_event_id(&id)?;
    let reservation = state.coordinator.reserve(caller.user_id(), event_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Seat reserved", reservation.into())),
    ))
}

/// DELETE /api/events/{id}/rsvp
pub async fn cancel(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CancellationResponse>>, ApiError> {
    let event_id = parse_event_id(&id)?;
    let cancellation = state.coordinator.cancel(caller.user_id(), event_id).await?;

    Ok(Json(ApiResponse::ok(
        "Reservation cancelled",
        cancellation.into(),
    )))
}

/// GET /api/rsvps
pub async fn list_my_reservations(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>, ApiError> {
    let reservations = state
        .event_service
        .list_user_reservations(caller.user_id())
        .await?;

    Ok(Json(ApiResponse::ok(
        format!("{} reservation(s)", reservations.len()),
        reservations.into_iter().map(Into::into).collect(),
    )))
}
