//! Integration tests for reserve, cancel, and listing reservations.

mod helpers;

use futures::future::join_all;
use http::StatusCode;

use rsvp_core::types::{EventId, UserId};

#[tokio::test]
async fn test_reserve_seat() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(2).await;
    let user = UserId::new();

    let response = app.reserve(event_id, user).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.success());
    assert_eq!(response.body["data"]["user_id"], user.to_string());
    assert_eq!(response.body["data"]["event_id"], event_id.to_string());
    assert_eq!(app.occupied(event_id).await, 1);
}

#[tokio::test]
async fn test_reserve_requires_caller() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(2).await;

    let response = app
        .request("POST", &format!("/api/events/{event_id}/rsvp"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(!response.success());
    assert_eq!(app.occupied(event_id).await, 0);
}

#[tokio::test]
async fn test_reserve_unknown_event_is_404() {
    let app = helpers::TestApp::new();

    let response = app.reserve(EventId::new(), UserId::new()).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("EVENT_NOT_FOUND"));
}

#[tokio::test]
async fn test_malformed_event_id_is_400() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/api/events/not-an-id/rsvp", None, Some(UserId::new()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_duplicate_reserve_is_400() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(5).await;
    let user = UserId::new();

    assert_eq!(app.reserve(event_id, user).await.status, StatusCode::CREATED);
    let response = app.reserve(event_id, user).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("ALREADY_RESERVED"));
    assert_eq!(app.occupied(event_id).await, 1);
}

#[tokio::test]
async fn test_full_event_is_400() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(1).await;

    assert_eq!(
        app.reserve(event_id, UserId::new()).await.status,
        StatusCode::CREATED
    );
    let response = app.reserve(event_id, UserId::new()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("EVENT_FULL"));
    assert_eq!(app.occupied(event_id).await, 1);
}

#[tokio::test]
async fn test_cancel_releases_seat() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(1).await;
    let user = UserId::new();
    app.reserve(event_id, user).await;

    let response = app.cancel(event_id, user).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.success());
    assert_eq!(response.body["data"]["occupied_seats"], 0);
    assert_eq!(app.occupied(event_id).await, 0);

    // The freed seat is available to someone else.
    assert_eq!(
        app.reserve(event_id, UserId::new()).await.status,
        StatusCode::CREATED
    );
}

#[tokio::test]
async fn test_cancel_without_reservation_is_404() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(1).await;

    let response = app.cancel(event_id, UserId::new()).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("RESERVATION_NOT_FOUND"));
    assert_eq!(app.occupied(event_id).await, 0);
}

#[tokio::test]
async fn test_list_my_reservations() {
    let app = helpers::TestApp::new();
    let user = UserId::new();
    let first = app.create_event(3).await;
    let second = app.create_event(3).await;
    app.reserve(first, user).await;
    app.reserve(second, user).await;
    app.reserve(first, UserId::new()).await;

    let response = app.request("GET", "/api/rsvps", None, Some(user)).await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response.body["data"].as_array().expect("data is an array");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|r| r["user_id"] == user.to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_respect_capacity() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(2).await;

    let responses = join_all((0..10).map(|_| app.reserve(event_id, UserId::new()))).await;

    let created = responses
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    let full = responses
        .iter()
        .filter(|r| r.error_code() == Some("EVENT_FULL"))
        .count();

    assert_eq!(created, 2);
    assert_eq!(full, 8);
    assert_eq!(app.occupied(event_id).await, 2);
}
