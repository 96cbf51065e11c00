//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use rsvp_core::config::AppConfig;
use rsvp_core::types::{EventId, UserId};
use rsvp_database::MemoryReservationStore;

/// Test application context
pub struct TestApp {
    /// The Axum app (router + middleware) for making test requests
    pub router: Router,
    /// In-memory store for direct inspection
    pub store: MemoryReservationStore,
    /// Application config
    pub config: AppConfig,
    /// The user that creates events through [`TestApp::create_event`]
    pub organizer: UserId,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        let config = AppConfig::default();

        let store = MemoryReservationStore::new(config.reservation.lock_timeout());
        let state = rsvp_api::AppState::new(config.clone(), Arc::new(store.clone()));
        let router = rsvp_api::build_app(state);

        Self {
            router,
            store,
            config,
            organizer: UserId::new(),
        }
    }

    /// Create an event owned by [`TestApp::organizer`] and return its ID
    pub async fn create_event(&self, capacity: i32) -> EventId {
        let response = self
            .request(
                "POST",
                "/api/events",
                Some(serde_json::json!({
                    "title": "Rust meetup",
                    "category": "tech",
                    "capacity": capacity,
                })),
                Some(self.organizer),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Event creation failed: {:?}",
            response.body
        );

        response.body["data"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("No event id in create response")
    }

    /// Reserve a seat for `user`
    pub async fn reserve(&self, event_id: EventId, user: UserId) -> TestResponse {
        self.request("POST", &format!("/api/events/{event_id}/rsvp"), None, Some(user))
            .await
    }

    /// Cancel the reservation of `user`
    pub async fn cancel(&self, event_id: EventId, user: UserId) -> TestResponse {
        self.request("DELETE", &format!("/api/events/{event_id}/rsvp"), None, Some(user))
            .await
    }

    /// Committed occupancy of an event
    pub async fn occupied(&self, event_id: EventId) -> i32 {
        self.store
            .ledger(event_id)
            .await
            .expect("Event missing from store")
            .occupied_seats
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<UserId>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req.header("X-User-Id", user.to_string());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `success` flag of the response envelope
    pub fn success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(false)
    }

    /// The machine-readable error code, if any
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"].as_str()
    }
}
