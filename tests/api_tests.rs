//! End-to-end tests driving the HTTP surface with in-process requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use kitchen_timer::api::responses::{ApiResponse, TimerListResponse};
use kitchen_timer::{create_router, AppState, Storage};

fn test_app() -> (Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(dir.path().join("timers.json"));
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), storage));
    (create_router(Arc::clone(&state)), state, dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, bytes.to_vec())
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn create_timer(app: &Router, title: &str, seconds: u64) -> String {
    let (status, _) = send(
        app,
        post_json(
            "/timers",
            json!({
                "title": title,
                "hours": seconds / 3600,
                "minutes": (seconds % 3600) / 60,
                "seconds": seconds % 60,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(
        app,
        Request::builder().uri("/timers").body(Body::empty()).unwrap(),
    )
    .await;
    let list: TimerListResponse = serde_json::from_slice(&body).expect("list");
    list.timers
        .iter()
        .find(|t| t.title == title)
        .expect("created timer")
        .id
        .clone()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (app, _state, _dir) = test_app();

    let (status, body) = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn created_timer_shows_up_full_and_stopped() {
    let (app, _state, _dir) = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/timers",
            json!({ "title": "Tea", "hours": 0, "minutes": 0, "seconds": 10 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let response: ApiResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.status, "ok");
    assert_eq!(response.timers.len(), 1);
    assert_eq!(response.timers[0].title, "Tea");
    assert_eq!(response.timers[0].duration, 10);
    assert_eq!(response.timers[0].remaining_time, 10);
    assert!(!response.timers[0].is_running);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_touching_the_collection() {
    let (app, state, _dir) = test_app();

    for body in [
        json!({ "title": "   ", "seconds": 10 }),
        json!({ "title": "Tea", "hours": 0, "minutes": 0, "seconds": 0 }),
        json!({ "title": "x".repeat(51), "seconds": 10 }),
        json!({ "title": "Tea", "hours": 24, "seconds": 10 }),
    ] {
        let (status, _) = send(&app, post_json("/timers", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    assert!(state.timers().unwrap().is_empty());
}

#[tokio::test]
async fn toggle_starts_and_pauses_a_timer() {
    let (app, state, _dir) = test_app();
    let id = create_timer(&app, "Tea", 10).await;

    let (status, body) = send(&app, post_json(&format!("/timers/{}/toggle", id), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let response: ApiResponse = serde_json::from_slice(&body).unwrap();
    assert!(response.timers[0].is_running);

    let (_, body) = send(&app, post_json(&format!("/timers/{}/toggle", id), json!({}))).await;
    let response: ApiResponse = serde_json::from_slice(&body).unwrap();
    assert!(!response.timers[0].is_running);

    assert!(!state.timers().unwrap()[0].is_running);
}

#[tokio::test]
async fn restart_resets_a_partially_elapsed_timer() {
    let (app, state, _dir) = test_app();
    let id = create_timer(&app, "Tea", 10).await;

    send(&app, post_json(&format!("/timers/{}/toggle", id), json!({}))).await;
    for _ in 0..4 {
        state.tick_timer(&id).unwrap();
    }
    assert_eq!(state.timers().unwrap()[0].remaining_time, 6);

    let (status, body) = send(&app, post_json(&format!("/timers/{}/restart", id), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let response: ApiResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.timers[0].remaining_time, 10);
    assert!(!response.timers[0].is_running);
}

#[tokio::test]
async fn edit_changes_duration_and_stops_the_countdown() {
    let (app, _state, _dir) = test_app();
    let id = create_timer(&app, "Laundry", 50).await;

    send(&app, post_json(&format!("/timers/{}/toggle", id), json!({}))).await;

    let (status, body) = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri(format!("/timers/{}", id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "duration": 5 }).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ApiResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.timers[0].duration, 5);
    assert_eq!(response.timers[0].remaining_time, 5);
    assert!(!response.timers[0].is_running);
}

#[tokio::test]
async fn delete_of_unknown_id_is_harmless() {
    let (app, state, _dir) = test_app();
    create_timer(&app, "Tea", 10).await;

    let (status, body) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/timers/no-such-id")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ApiResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.status, "error");
    assert_eq!(state.timers().unwrap().len(), 1);
}

#[tokio::test]
async fn collection_survives_a_simulated_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("timers.json");

    // First process lifetime: create three timers.
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Storage::new(path.clone()),
    ));
    let app = create_router(Arc::clone(&state));
    for title in ["Tea", "Pasta", "Laundry"] {
        create_timer(&app, title, 60).await;
    }
    let before = state.timers().unwrap();

    // Second process lifetime: rehydrate from the same record.
    let restarted = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Storage::new(path.clone()),
    ));
    let loaded = restarted.storage().load().expect("load");
    restarted.replace_all(loaded).unwrap();

    let app = create_router(Arc::clone(&restarted));
    let (status, body) = send(
        &app,
        Request::builder().uri("/timers").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let list: TimerListResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.timers.len(), 3);
    for (saved, loaded) in before.iter().zip(&list.timers) {
        assert_eq!(saved.id, loaded.id);
        assert_eq!(saved.title, loaded.title);
        assert_eq!(saved.created_at, loaded.created_at);
    }
}
