//! Event lifecycle and reservation listings.

use std::sync::Arc;

use tracing::info;

use rsvp_core::error::AppError;
use rsvp_core::types::{EventId, UserId};
use rsvp_database::ReservationStore;
use rsvp_entity::{Event, EventUpdate, NewEvent, Reservation};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: u64 = 100;
/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: u64 = 500;
/// Smallest capacity an event can be created with.
pub const MIN_CAPACITY: i32 = 1;

/// Creates, edits, and deletes events and lists reservations.
///
/// Only the creator of an event may edit it, delete it, or see who holds
/// its seats. Never writes `capacity` or `occupied_seats`; the latter
/// belongs to the reservation coordinator.
#[derive(Debug, Clone)]
pub struct EventService {
    /// Transactional store.
    store: Arc<dyn ReservationStore>,
}

impl EventService {
    /// Creates a new event service.
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Creates an event with no seats occupied, owned by `new_event.creator_id`.
    pub async fn create_event(&self, mut new_event: NewEvent) -> Result<Event, AppError> {
        new_event.title = new_event.title.trim().to_string();
        validate_new_event(&new_event)?;

        let event = self.store.create_event(new_event).await?;

        info!(
            event_id = %event.id,
            creator_id = %event.creator_id,
            capacity = event.capacity,
            category = %event.category,
            "Event created"
        );

        Ok(event)
    }

    /// Gets an event by ID.
    pub async fn get_event(&self, event_id: EventId) -> Result<Event, AppError> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))
    }

    /// Changes descriptive fields of an event the caller created.
    pub async fn update_event(
        &self,
        caller: UserId,
        event_id: EventId,
        mut changes: EventUpdate,
    ) -> Result<Event, AppError> {
        if let Some(title) = changes.title.take() {
            changes.title = Some(title.trim().to_string());
        }
        validate_update(&changes)?;
        self.owned_event(caller, event_id, "update").await?;

        let event = self
            .store
            .update_event(event_id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        info!(%event_id, "Event updated");

        Ok(event)
    }

    /// Deletes an event the caller created, with every reservation for it.
    ///
    /// Returns the number of reservations removed.
    pub async fn delete_event(&self, caller: UserId, event_id: EventId) -> Result<u64, AppError> {
        self.owned_event(caller, event_id, "delete").await?;

        let removed = self
            .store
            .delete_event(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        info!(%event_id, reservations_removed = removed, "Event deleted");

        Ok(removed)
    }

    /// Lists the caller's reservations, newest first.
    pub async fn list_user_reservations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Reservation>, AppError> {
        self.store.list_reservations_by_user(user_id).await
    }

    /// Lists reservations for an event the caller created, oldest first.
    pub async fn list_event_reservations(
        &self,
        caller: UserId,
        event_id: EventId,
    ) -> Result<Vec<Reservation>, AppError> {
        self.owned_event(caller, event_id, "view reservations of").await?;
        self.store.list_reservations_by_event(event_id).await
    }

    /// Load an event and check that `caller` created it.
    async fn owned_event(
        &self,
        caller: UserId,
        event_id: EventId,
        action: &str,
    ) -> Result<Event, AppError> {
        let event = self.get_event(event_id).await?;
        if !event.is_created_by(caller) {
            return Err(AppError::forbidden(format!(
                "Not authorized to {action} this event"
            )));
        }
        Ok(event)
    }
}

/// Checks field limits on a new event.
pub fn validate_new_event(new_event: &NewEvent) -> Result<(), AppError> {
    validate_title(&new_event.title)?;
    if let Some(description) = &new_event.description {
        validate_description(description)?;
    }
    if new_event.capacity < MIN_CAPACITY {
        return Err(AppError::validation(format!(
            "Capacity must be at least {MIN_CAPACITY}"
        )));
    }
    Ok(())
}

/// Checks field limits on an update. An empty update is rejected.
pub fn validate_update(changes: &EventUpdate) -> Result<(), AppError> {
    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }
    if let Some(title) = &changes.title {
        validate_title(title)?;
    }
    if let Some(description) = &changes.description {
        validate_description(description)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), AppError> {
    let len = title.chars().count() as u64;
    if len == 0 {
        return Err(AppError::validation("Title cannot be empty"));
    }
    if len > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() as u64 > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
