//! Request DTOs with validation.
//!
//! Field limits are shared with the event service so the HTTP layer and the
//! service reject the same inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use rsvp_core::types::UserId;
use rsvp_entity::{EventCategory, EventUpdate, NewEvent};
use rsvp_service::event::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, MIN_CAPACITY};

/// Create event request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    /// Title.
    #[validate(length(min = 1, max = MAX_TITLE_LEN, message = "Title must be 1-100 characters"))]
    pub title: String,
    /// Description.
    #[validate(length(max = MAX_DESCRIPTION_LEN, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    /// Venue or address.
    pub location: Option<String>,
    /// Category; defaults to `other`.
    #[serde(default)]
    pub category: EventCategory,
    /// Scheduled start.
    #[serde(alias = "date")]
    pub starts_at: Option<DateTime<Utc>>,
    /// Total seats.
    #[validate(range(min = MIN_CAPACITY, message = "Capacity must be at least 1"))]
    pub capacity: i32,
}

impl CreateEventRequest {
    /// Creation input owned by `creator_id`.
    pub fn into_new_event(self, creator_id: UserId) -> NewEvent {
        NewEvent {
            creator_id,
            title: self.title,
            description: self.description,
            location: self.location,
            category: self.category,
            starts_at: self.starts_at,
            capacity: self.capacity,
        }
    }
}

/// Update event request body. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEventRequest {
    /// New title.
    #[validate(length(min = 1, max = MAX_TITLE_LEN, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    /// New description.
    #[validate(length(max = MAX_DESCRIPTION_LEN, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    /// New venue or address.
    pub location: Option<String>,
    /// New category.
    pub category: Option<EventCategory>,
    /// New start.
    #[serde(alias = "date")]
    pub starts_at: Option<DateTime<Utc>>,
    /// Accepted only to be rejected; capacity is fixed at creation.
    pub capacity: Option<i32>,
}

impl From<UpdateEventRequest> for EventUpdate {
    fn from(req: UpdateEventRequest) -> Self {
        EventUpdate {
            title: req.title,
            description: req.description,
            location: req.location,
            category: req.category,
            starts_at: req.starts_at,
        }
    }
}
