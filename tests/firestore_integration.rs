// SPDX-License-Identifier: MIT

//! End-to-end tests against the Firestore emulator.
//!
//! Run with: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test
//! Each test seeds its own users and events with unique ids so tests can
//! share an emulator instance.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use investsync_api::models::{Role, User};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

/// Issue a JSON request through the router and parse the response body.
async fn call(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Seed an admin user and return (uid, token).
async fn seed_admin(db: &investsync_api::db::FirestoreDb) -> (String, String) {
    let uid = format!("admin-{}", uuid::Uuid::new_v4());
    db.upsert_user(
        &uid,
        &User {
            real_name: Some("Test Admin".to_string()),
            role: Some(Role::Admin),
        },
    )
    .await
    .expect("seed admin");
    let token = common::test_jwt(&uid);
    (uid, token)
}

fn event_form(title: &str, date: &str, time: &str, category: &str) -> Value {
    json!({
        "title": title,
        "subtitle": "Integration",
        "location": "Test Hall",
        "description": "Created by integration tests",
        "category": category,
        "date_input": date,
        "time_input": time,
        "utc_offset_minutes": 0,
    })
}

#[tokio::test]
async fn test_admin_gating() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());

    // A plain user (no profile at all) cannot create events
    let user_token = common::test_jwt(&format!("user-{}", uuid::Uuid::new_v4()));
    let (status, _) = call(
        app.clone(),
        Method::POST,
        "/api/events",
        &user_token,
        Some(event_form("GATED", "2024-07-21", "11:00", "tech")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An admin can
    let (_, admin_token) = seed_admin(&db).await;
    let (status, body) = call(
        app,
        Method::POST,
        "/api/events",
        &admin_token,
        Some(event_form("GATED", "2024-07-21", "11:00", "tech")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "GATED");
}

#[tokio::test]
async fn test_event_creation_derivation() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (_, admin_token) = seed_admin(&db).await;

    let (status, body) = call(
        app,
        Method::POST,
        "/api/events",
        &admin_token,
        Some(event_form("TECH EVENT", "2024-07-21", "11:00", "tech")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "SUNDAY, JULY 21");
    assert_eq!(body["time"], "11:00 AM");
    assert_eq!(body["color"], "from-pink-500 via-purple-600 to-indigo-800");
}

#[tokio::test]
async fn test_register_then_check_in_flow() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (_, admin_token) = seed_admin(&db).await;
    let uid = format!("user-{}", uuid::Uuid::new_v4());
    let user_token = common::test_jwt(&uid);

    // Admin creates the event
    let (status, created) = call(
        app.clone(),
        Method::POST,
        "/api/events",
        &admin_token,
        Some(event_form("FLOW EVENT", "2024-08-10", "18:00", "music")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let event_id = created["id"].as_str().unwrap().to_string();

    // User registers
    let (status, body) = call(
        app.clone(),
        Method::POST,
        &format!("/api/events/{}/register", event_id),
        &user_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], true);
    assert_eq!(body["attended"], false);

    // Admin fetches the QR payload, user scans it
    let (status, code) = call(
        app.clone(),
        Method::GET,
        &format!("/api/events/{}/checkin-code", event_id),
        &admin_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payload = code["payload"].as_str().unwrap().to_string();

    let (status, body) = call(
        app.clone(),
        Method::POST,
        "/api/checkin",
        &user_token,
        Some(json!({ "payload": payload })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], true);
    assert_eq!(body["attended"], true);

    // Scanning twice is idempotent
    let (status, body) = call(
        app.clone(),
        Method::POST,
        "/api/checkin",
        &user_token,
        Some(json!({ "payload": payload })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attended"], true);

    // Re-registering after attendance must not clear it
    let (status, body) = call(
        app.clone(),
        Method::POST,
        &format!("/api/events/{}/register", event_id),
        &user_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attended"], true);

    // Detail view reflects the final state and the invariant
    let (status, detail) = call(
        app,
        Method::GET,
        &format!("/api/events/{}", event_id),
        &user_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["my_status"]["registered"], true);
    assert_eq!(detail["my_status"]["attended"], true);
}

#[tokio::test]
async fn test_check_in_requires_registration() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (_, admin_token) = seed_admin(&db).await;

    let (_, created) = call(
        app.clone(),
        Method::POST,
        "/api/events",
        &admin_token,
        Some(event_form("STRICT EVENT", "2024-08-02", "09:00", "sport")),
    )
    .await;
    let event_id = created["id"].as_str().unwrap().to_string();

    // A user who never registered cannot check in
    let stranger_token = common::test_jwt(&format!("user-{}", uuid::Uuid::new_v4()));
    let payload = json!({ "type": "ATTENDANCE", "eventId": event_id }).to_string();

    let (status, body) = call(
        app.clone(),
        Method::POST,
        "/api/checkin",
        &stranger_token,
        Some(json!({ "payload": payload })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_registered");

    // The attendee map is untouched
    let event = db.get_event(&event_id).await.unwrap().unwrap();
    assert!(event.attendees.is_empty());
}

#[tokio::test]
async fn test_check_in_unknown_event() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db);
    let user_token = common::test_jwt(&format!("user-{}", uuid::Uuid::new_v4()));

    let payload = json!({ "type": "ATTENDANCE", "eventId": "no-such-event" }).to_string();
    let (status, _) = call(
        app,
        Method::POST,
        "/api/checkin",
        &user_token,
        Some(json!({ "payload": payload })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_orders_by_sortable_instant() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (_, admin_token) = seed_admin(&db).await;
    let user_token = common::test_jwt(&format!("user-{}", uuid::Uuid::new_v4()));

    // Create T2, T3, T1 out of chronological order
    let mut ids = Vec::new();
    for (date, time) in [
        ("2030-05-02", "09:00"),
        ("2030-05-03", "09:00"),
        ("2030-05-01", "09:00"),
    ] {
        let (status, created) = call(
            app.clone(),
            Method::POST,
            "/api/events",
            &admin_token,
            Some(event_form("ORDERED", date, time, "tech")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let (status, body) = call(app, Method::GET, "/api/events", &user_token, None).await;
    assert_eq!(status, StatusCode::OK);

    // Other tests may have seeded events; only the relative order of ours matters
    let ours: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["id"].as_str())
        .filter(|id| ids.iter().any(|mine| mine == id))
        .collect();

    assert_eq!(ours, vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);
}

#[tokio::test]
async fn test_edit_preserves_attendees_and_delete_removes_state() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (_, admin_token) = seed_admin(&db).await;
    let uid = format!("user-{}", uuid::Uuid::new_v4());
    let user_token = common::test_jwt(&uid);

    let (_, created) = call(
        app.clone(),
        Method::POST,
        "/api/events",
        &admin_token,
        Some(event_form("EDIT ME", "2024-08-10", "18:00", "music")),
    )
    .await;
    let event_id = created["id"].as_str().unwrap().to_string();

    call(
        app.clone(),
        Method::POST,
        &format!("/api/events/{}/register", event_id),
        &user_token,
        None,
    )
    .await;

    // Editing re-derives display fields but keeps the attendee map
    let (status, edited) = call(
        app.clone(),
        Method::PUT,
        &format!("/api/events/{}", event_id),
        &admin_token,
        Some(event_form("EDITED", "2024-08-11", "19:30", "sport")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["title"], "EDITED");
    assert_eq!(edited["time"], "7:30 PM");

    let event = db.get_event(&event_id).await.unwrap().unwrap();
    assert!(event.attendees.get(&uid).map(|s| s.registered).unwrap_or(false));

    // Delete removes the event and with it all attendee state
    let (status, _) = call(
        app.clone(),
        Method::DELETE,
        &format!("/api/events/{}", event_id),
        &admin_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        app,
        Method::GET,
        &format!("/api/events/{}", event_id),
        &user_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_me_reports_name_and_role() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (_, admin_token) = seed_admin(&db).await;

    // Both profile fields must survive into the response together
    let (status, body) = call(app, Method::GET, "/api/me", &admin_token, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["real_name"], "Test Admin");
    assert_eq!(body["is_admin"], true);
}

#[tokio::test]
async fn test_real_name_merge_preserves_role() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, _) = common::create_test_app_with_db(db.clone());
    let (uid, admin_token) = seed_admin(&db).await;

    let (status, _) = call(
        app,
        Method::PUT,
        "/api/me",
        &admin_token,
        Some(json!({ "real_name": "Grace Hopper" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Field-merge write must not clobber the out-of-band role
    let user = db.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(user.real_name.as_deref(), Some("Grace Hopper"));
    assert!(user.is_admin());
}
