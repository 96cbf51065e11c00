//! Typed path parameter helpers.

use rsvp_core::error::AppError;
use rsvp_core::types::EventId;

/// Parses an event id from a path segment.
pub fn parse_event_id(s: &str) -> Result<EventId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid event id: {s}")))
}
