//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rsvp_core::types::{EventId, ReservationId, UserId};
use rsvp_entity::{Event, EventCategory, Reservation};
use rsvp_service::Cancellation;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Response data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Event with its current seat counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: EventId,
    pub creator_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: EventCategory,
    pub starts_at: Option<DateTime<Utc>>,
    pub capacity: i32,
    pub occupied_seats: i32,
    pub available_seats: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let available_seats = event.ledger().available_seats();
        Self {
            id: event.id,
            creator_id: event.creator_id,
            title: event.title,
            description: event.description,
            location: event.location,
            category: event.category,
            starts_at: event.starts_at,
            capacity: event.capacity,
            occupied_seats: event.occupied_seats,
            available_seats,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// A committed reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            user_id: reservation.user_id,
            event_id: reservation.event_id,
            created_at: reservation.created_at,
        }
    }
}

/// Result of a cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationResponse {
    /// The removed reservation.
    pub reservation: ReservationResponse,
    /// Occupancy after release; absent when the event no longer exists.
    pub occupied_seats: Option<i32>,
}

impl From<Cancellation> for CancellationResponse {
    fn from(cancellation: Cancellation) -> Self {
        Self {
            reservation: cancellation.reservation.into(),
            occupied_seats: cancellation.occupied_seats,
        }
    }
}

/// Result of deleting an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDeletedResponse {
    pub event_id: EventId,
    pub reservations_removed: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// Store backend reachability.
    pub store: String,
}
