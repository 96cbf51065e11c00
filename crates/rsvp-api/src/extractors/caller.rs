//! `Caller` extractor: the user on whose behalf the request is made.
//!
//! Authentication happens upstream; the gateway forwards the verified user
//! id in the `X-User-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rsvp_core::error::AppError;
use rsvp_core::types::UserId;

use crate::error::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub UserId);

impl Caller {
    /// Returns the caller's user id.
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing X-User-Id header"))?;

        let user_id = raw
            .trim()
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized("Invalid X-User-Id header"))?;

        Ok(Caller(user_id))
    }
}
