//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rsvp_core::types::{EventId, UserId};

use super::category::EventCategory;
use super::ledger::SeatLedger;

/// An event that users reserve seats for.
///
/// Descriptive fields belong to the event CRUD layer and may be changed by
/// the creator. `capacity` is fixed at creation; `occupied_seats` is written
/// only by the reservation coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// The user who created the event and may edit or delete it.
    pub creator_id: UserId,
    /// Event title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Venue or address.
    pub location: Option<String>,
    /// Category.
    pub category: EventCategory,
    /// Scheduled start.
    pub starts_at: Option<DateTime<Utc>>,
    /// Total seats; fixed at creation.
    pub capacity: i32,
    /// Seats held by committed reservations.
    pub occupied_seats: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last descriptive change.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a fresh event row from creation input, with no seats occupied.
    pub fn from_new(new: NewEvent) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            creator_id: new.creator_id,
            title: new.title,
            description: new.description,
            location: new.location,
            category: new.category,
            starts_at: new.starts_at,
            capacity: new.capacity,
            occupied_seats: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` created this event.
    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.creator_id == user_id
    }

    /// Apply a descriptive update in place. Seat counts are untouched.
    pub fn apply(&mut self, changes: EventUpdate) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(location) = changes.location {
            self.location = Some(location);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(starts_at) = changes.starts_at {
            self.starts_at = Some(starts_at);
        }
        self.updated_at = Utc::now();
    }

    /// Capacity ledger view of this event.
    pub fn ledger(&self) -> SeatLedger {
        SeatLedger {
            event_id: self.id,
            capacity: self.capacity,
            occupied_seats: self.occupied_seats,
        }
    }
}

/// Input for creating an event. Validated by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    /// The creating user.
    pub creator_id: UserId,
    /// Event title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Venue or address.
    pub location: Option<String>,
    /// Category.
    pub category: EventCategory,
    /// Scheduled start.
    pub starts_at: Option<DateTime<Utc>>,
    /// Total seats, at least 1.
    pub capacity: i32,
}

impl NewEvent {
    /// Minimal creation input with only a title and capacity.
    pub fn new(creator_id: UserId, title: impl Into<String>, capacity: i32) -> Self {
        Self {
            creator_id,
            title: title.into(),
            description: None,
            location: None,
            category: EventCategory::default(),
            starts_at: None,
            capacity,
        }
    }
}

/// Descriptive fields to change on an existing event. `None` leaves a
/// field as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub starts_at: Option<DateTime<Utc>>,
}

impl EventUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.starts_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_new_starts_empty() {
        let creator = UserId::new();
        let event = Event::from_new(NewEvent::new(creator, "Rust meetup", 40));
        assert_eq!(event.occupied_seats, 0);
        assert!(event.is_created_by(creator));
        assert!(!event.is_created_by(UserId::new()));
        assert_eq!(event.category, EventCategory::Other);

        let ledger = event.ledger();
        assert_eq!(ledger.event_id, event.id);
        assert_eq!(ledger.available_seats(), 40);
    }

    #[test]
    fn test_apply_keeps_seat_counts() {
        let mut event = Event::from_new(NewEvent::new(UserId::new(), "Rust meetup", 40));
        event.occupied_seats = 12;

        event.apply(EventUpdate {
            title: Some("Rust meetup #2".to_string()),
            category: Some(EventCategory::Tech),
            ..Default::default()
        });

        assert_eq!(event.title, "Rust meetup #2");
        assert_eq!(event.category, EventCategory::Tech);
        assert_eq!(event.description, None);
        assert_eq!(event.capacity, 40);
        assert_eq!(event.occupied_seats, 12);
        assert!(event.updated_at >= event.created_at);
    }
}
