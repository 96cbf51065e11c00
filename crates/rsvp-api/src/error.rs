//! Maps service and store errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use rsvp_core::error::{AppError, ErrorKind};
use rsvp_service::ReservationError;

/// Message returned for every transient failure. Store details stay in the logs.
const RETRY_MESSAGE: &str = "Service temporarily unavailable, please retry";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    pub error: String,
}

/// Any error a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Infrastructure, validation, or lookup failure.
    #[error(transparent)]
    App(#[from] AppError),
    /// Reserve or cancel outcome.
    #[error(transparent)]
    Reservation(#[from] ReservationError),
}

impl ApiError {
    /// Status code, error code, and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Reservation(err) => match err {
                ReservationError::EventNotFound => {
                    (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND", err.to_string())
                }
                ReservationError::ReservationNotFound => (
                    StatusCode::NOT_FOUND,
                    "RESERVATION_NOT_FOUND",
                    err.to_string(),
                ),
                ReservationError::AlreadyReserved => {
                    (StatusCode::BAD_REQUEST, "ALREADY_RESERVED", err.to_string())
                }
                ReservationError::EventFull => {
                    (StatusCode::BAD_REQUEST, "EVENT_FULL", err.to_string())
                }
                ReservationError::Transient(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    RETRY_MESSAGE.to_string(),
                ),
            },
            Self::App(err) => match err.kind {
                ErrorKind::Validation => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    err.message.clone(),
                ),
                ErrorKind::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.message.clone())
                }
                ErrorKind::Authorization => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", err.message.clone())
                }
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.message.clone()),
                ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT", err.message.clone()),
                ErrorKind::Timeout | ErrorKind::ServiceUnavailable => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    RETRY_MESSAGE.to_string(),
                ),
                ErrorKind::Database
                | ErrorKind::Configuration
                | ErrorKind::Serialization
                | ErrorKind::Internal => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            if status == StatusCode::SERVICE_UNAVAILABLE {
                warn!(error = %self, "Request failed transiently");
            } else {
                error!(error = %self, "Internal server error");
            }
        }

        let body = ApiErrorResponse {
            success: false,
            message,
            error: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_reservation_outcomes() {
        assert_eq!(status(ReservationError::EventNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ReservationError::ReservationNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(ReservationError::AlreadyReserved),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(ReservationError::EventFull), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ReservationError::Transient(AppError::timeout("lock wait"))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_app_errors() {
        assert_eq!(status(AppError::validation("bad")), StatusCode::BAD_REQUEST);
        assert_eq!(status(AppError::unauthorized("who")), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AppError::forbidden("not yours")), StatusCode::FORBIDDEN);
        assert_eq!(status(AppError::not_found("gone")), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AppError::database("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transient_message_hides_store_detail() {
        let err = ApiError::from(ReservationError::Transient(AppError::database(
            "password authentication failed",
        )));
        let (_, code, message) = err.parts();
        assert_eq!(code, "SERVICE_UNAVAILABLE");
        assert!(!message.contains("password"));
    }
}
