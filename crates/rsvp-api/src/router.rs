//! Route definitions for the RSVP HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router and thread `state` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(event_routes())
        .merge(reservation_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Liveness and store reachability
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Event lifecycle and organizer listing
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(handlers::event::create_event))
        .route(
            "/events/{id}",
            get(handlers::event::get_event)
                .put(handlers::event::update_event)
                .delete(handlers::event::delete_event),
        )
        .route(
            "/events/{id}/reservations",
            get(handlers::event::list_event_reservations),
        )
}

/// Reserve, cancel, and the caller's reservations
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{id}/rsvp",
            post(handlers::reservation::reserve).delete(handlers::reservation::cancel),
        )
        .route("/rsvps", get(handlers::reservation::list_my_reservations))
}
