//! Integration tests for event create, read, update, delete, and health.

mod helpers;

use http::StatusCode;

use rsvp_core::types::{EventId, UserId};

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], "connected");
}

#[tokio::test]
async fn test_create_and_get_event() {
    let app = helpers::TestApp::new();
    let creator = UserId::new();

    let response = app
        .request(
            "POST",
            "/api/events",
            Some(serde_json::json!({
                "title": "Quarterly planning",
                "description": "Roadmap review",
                "location": "Room 4",
                "category": "business",
                "date": "2026-11-02T09:00:00Z",
                "capacity": 12,
            })),
            Some(creator),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    assert_eq!(data["category"], "business");
    assert_eq!(data["creator_id"], creator.to_string());
    assert_eq!(data["occupied_seats"], 0);
    assert_eq!(data["available_seats"], 12);

    let id = data["id"].as_str().unwrap();
    let response = app
        .request("GET", &format!("/api/events/{id}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "Quarterly planning");
    assert_eq!(response.body["data"]["capacity"], 12);
}

#[tokio::test]
async fn test_create_event_validation() {
    let app = helpers::TestApp::new();

    for body in [
        serde_json::json!({ "title": "", "capacity": 5 }),
        serde_json::json!({ "title": "Standup", "capacity": 0 }),
        serde_json::json!({ "title": "x".repeat(101), "capacity": 5 }),
    ] {
        let response = app
            .request("POST", "/api/events", Some(body), Some(UserId::new()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
    }
}

#[tokio::test]
async fn test_seat_counts_follow_reservations() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(3).await;
    app.reserve(event_id, UserId::new()).await;

    let response = app
        .request("GET", &format!("/api/events/{event_id}"), None, None)
        .await;

    assert_eq!(response.body["data"]["occupied_seats"], 1);
    assert_eq!(response.body["data"]["available_seats"], 2);
}

#[tokio::test]
async fn test_get_unknown_event_is_404() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", &format!("/api/events/{}", EventId::new()), None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_event_reservations() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(3).await;
    app.reserve(event_id, UserId::new()).await;
    app.reserve(event_id, UserId::new()).await;

    let response = app
        .request(
            "GET",
            &format!("/api/events/{event_id}/reservations"),
            None,
            Some(app.organizer),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);

    let response = app
        .request(
            "GET",
            &format!("/api/events/{event_id}/reservations"),
            None,
            Some(UserId::new()),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("FORBIDDEN"));
}

#[tokio::test]
async fn test_delete_event_cascades() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(3).await;
    let user = UserId::new();
    app.reserve(event_id, user).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/events/{event_id}"),
            None,
            Some(app.organizer),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["reservations_removed"], 1);

    let response = app.request("GET", "/api/rsvps", None, Some(user)).await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 0);

    let response = app.cancel(event_id, user).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "DELETE",
            &format!("/api/events/{event_id}"),
            None,
            Some(app.organizer),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_creator_may_delete_event() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(3).await;
    app.reserve(event_id, UserId::new()).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/events/{event_id}"),
            None,
            Some(UserId::new()),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("FORBIDDEN"));
    assert_eq!(app.occupied(event_id).await, 1);
    assert_eq!(app.store.reservation_count(event_id).await, 1);
}

#[tokio::test]
async fn test_update_event() {
    let app = helpers::TestApp::new();
    let event_id = app.create_event(3).await;
    app.reserve(event_id, UserId::new()).await;
    let path = format!("/api/events/{event_id}");

    let response = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "title": "Rust meetup: async", "location": "Hall B" })),
            Some(app.organizer),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["title"], "Rust meetup: async");
    assert_eq!(data["location"], "Hall B");
    assert_eq!(data["category"], "tech");
    assert_eq!(data["capacity"], 3);
    assert_eq!(data["occupied_seats"], 1);

    let response = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "title": "Hijacked" })),
            Some(UserId::new()),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "capacity": 50 })),
            Some(app.organizer),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.body["data"]["title"], "Rust meetup: async");
    assert_eq!(response.body["data"]["capacity"], 3);
}
