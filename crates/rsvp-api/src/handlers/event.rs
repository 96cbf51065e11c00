//! Event handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use rsvp_core::error::AppError;

use crate::dto::request::{CreateEventRequest, UpdateEventRequest};
use crate::dto::response::{ApiResponse, EventDeletedResponse, EventResponse, ReservationResponse};
use crate::error::ApiError;
use crate::extractors::{Caller, parse_event_id};
use crate::state::AppState;

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponse>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {e}")))?;

    let event = state
        .event_service
        .create_event(req.into_new_event(caller.user_id()))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Event created", event.into())),
    ))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventResponse>>, ApiError> {
    let event_id = parse_event_id(&id)?;
    let event = state.event_service.get_event(event_id).await?;

    Ok(Json(ApiResponse::ok("Event found", event.into())))
}

/// PUT /api/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<ApiResponse<EventResponse>>, ApiError> {
    let event_id = parse_event_id(&id)?;
    if req.capacity.is_some() {
        return Err(AppError::validation("Capacity cannot be changed after creation").into());
    }
    req.validate()
        .map_err(|e| AppError::validation(format!("Validation failed: {e}")))?;

    let event = state
        .event_service
        .update_event(caller.user_id(), event_id, req.into())
        .await?;

    Ok(Json(ApiResponse::ok("Event updated", event.into())))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventDeletedResponse>>, ApiError> {
    let event_id = parse_event_id(&id)?;
    let reservations_removed = state
        .event_service
        .delete_event(caller.user_id(), event_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Event deleted",
        EventDeletedResponse {
            event_id,
            reservations_removed,
        },
    )))
}

/// GET /api/events/{id}/reservations
pub async fn list_event_reservations(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>, ApiError> {
    let event_id = parse_event_id(&id)?;
    let reservations = state
        .event_service
        .list_event_reservations(caller.user_id(), event_id)
        .await?;

    Ok(Json(ApiResponse::ok(
        format!("{} reservation(s)", reservations.len()),
        reservations.into_iter().map(Into::into).collect(),
    )))
}
