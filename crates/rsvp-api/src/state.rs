//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use rsvp_core::config::AppConfig;
use rsvp_database::ReservationStore;
use rsvp_service::{EventService, ReservationCoordinator};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Backing store (PostgreSQL or in-memory)
    pub store: Arc<dyn ReservationStore>,
    /// Reserve / cancel protocol
    pub coordinator: Arc<ReservationCoordinator>,
    /// Event lifecycle and listings
    pub event_service: Arc<EventService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wires the services over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn ReservationStore>) -> Self {
        let coordinator = Arc::new(ReservationCoordinator::new(
            Arc::clone(&store),
            &config.reservation,
        ));
        let event_service = Arc::new(EventService::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            store,
            coordinator,
            event_service,
            started_at: Instant::now(),
        }
    }
}
