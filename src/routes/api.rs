// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{AttendeeStatus, Category, CheckInPayload, Event, EventForm};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(edit_event).delete(delete_event),
        )
        .route("/api/events/{id}/register", post(register))
        .route("/api/events/{id}/checkin-code", get(checkin_code))
        .route("/api/checkin", post(check_in))
}

/// Server-side admin gate: reads the caller's profile and requires the
/// admin role. The UI hides admin actions too, but that is a convenience,
/// not the enforcement.
async fn require_admin(state: &AppState, user: &AuthUser) -> Result<()> {
    let profile = state.db.get_user(&user.uid).await?.unwrap_or_default();
    if !profile.is_admin() {
        tracing::warn!(uid = %user.uid, "Admin action denied");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub uid: String,
    pub real_name: Option<String>,
    pub is_admin: bool,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    // Profiles are created implicitly on first write; absence is not an error
    let profile = state.db.get_user(&user.uid).await?.unwrap_or_default();

    Ok(Json(UserResponse {
        uid: user.uid,
        is_admin: profile.is_admin(),
        real_name: profile.real_name,
    }))
}

#[derive(Deserialize)]
struct UpdateMeRequest {
    real_name: String,
}

/// Set the current user's self-reported real name.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>> {
    let real_name = body.real_name.trim();
    if real_name.is_empty() {
        return Err(AppError::BadRequest("real_name must not be blank".to_string()));
    }

    state.db.merge_real_name(&user.uid, real_name).await?;

    let profile = state.db.get_user(&user.uid).await?.unwrap_or_default();

    Ok(Json(UserResponse {
        uid: user.uid,
        is_admin: profile.is_admin(),
        real_name: profile.real_name,
    }))
}

// ─── Events ──────────────────────────────────────────────────

/// Event fields shared by list and detail responses.
#[derive(Serialize)]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub location: String,
    pub description: String,
    pub category: Category,
    pub color: String,
    pub date: String,
    pub time: String,
    pub sortable_date: String,
}

impl EventSummary {
    fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            subtitle: event.subtitle.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            category: event.category,
            color: event.color.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            sortable_date: event
                .sortable_date
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

#[derive(Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventSummary>,
}

/// List all events, oldest first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EventListResponse>> {
    tracing::debug!(uid = %user.uid, "Fetching event feed");

    let events = state.registry.list().await?;

    Ok(Json(EventListResponse {
        events: events.iter().map(EventSummary::from_event).collect(),
    }))
}

/// Event detail, including the caller's own attendance status.
#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventSummary,
    pub attendee_count: usize,
    /// The caller's attendee entry, if any
    pub my_status: Option<AttendeeStatus>,
}

/// Get a single event.
async fn get_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetailResponse>> {
    let event = state.registry.get(&event_id).await?;

    Ok(Json(EventDetailResponse {
        attendee_count: event.attendees.len(),
        my_status: event.attendees.get(&user.uid).cloned(),
        event: EventSummary::from_event(&event),
    }))
}

/// Create an event (admin).
async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<EventForm>,
) -> Result<Json<EventSummary>> {
    require_admin(&state, &user).await?;

    let event = state.registry.create(form).await?;
    Ok(Json(EventSummary::from_event(&event)))
}

/// Edit an event (admin). All fields are re-derived and overwritten.
async fn edit_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
    Json(form): Json<EventForm>,
) -> Result<Json<EventSummary>> {
    require_admin(&state, &user).await?;

    let event = state.registry.edit(&event_id, form).await?;
    Ok(Json(EventSummary::from_event(&event)))
}

#[derive(Serialize)]
pub struct DeleteEventResponse {
    pub deleted: bool,
}

/// Delete an event and all attendee state (admin).
async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<DeleteEventResponse>> {
    require_admin(&state, &user).await?;

    state.registry.delete(&event_id).await?;
    Ok(Json(DeleteEventResponse { deleted: true }))
}

// ─── Registration & Check-In ─────────────────────────────────

#[derive(Serialize)]
pub struct AttendanceResponse {
    pub event_id: String,
    pub registered: bool,
    pub attended: bool,
}

impl AttendanceResponse {
    fn new(event_id: String, status: &AttendeeStatus) -> Self {
        Self {
            event_id,
            registered: status.registered,
            attended: status.attended,
        }
    }
}

/// Register the current user for an event.
async fn register(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<AttendanceResponse>> {
    let status = state.attendance.register(&event_id, &user.uid).await?;
    Ok(Json(AttendanceResponse::new(event_id, &status)))
}

/// QR payload for an event's check-in screen (admin).
#[derive(Serialize)]
pub struct CheckInCodeResponse {
    pub event_id: String,
    /// The string to render as a QR code
    pub payload: String,
}

async fn checkin_code(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(event_id): Path<String>,
) -> Result<Json<CheckInCodeResponse>> {
    require_admin(&state, &user).await?;

    // 404 for stale ids before handing out a scannable payload
    let event = state.registry.get(&event_id).await?;

    Ok(Json(CheckInCodeResponse {
        payload: CheckInPayload::new(event.id.clone()).encode(),
        event_id: event.id,
    }))
}

#[derive(Deserialize)]
struct CheckInRequest {
    /// Raw scanned QR string
    payload: String,
}

/// Confirm attendance from a scanned QR payload.
async fn check_in(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CheckInRequest>,
) -> Result<Json<AttendanceResponse>> {
    let (event_id, status) = state
        .attendance
        .check_in_scan(&body.payload, &user.uid, chrono::Utc::now())
        .await?;

    Ok(Json(AttendanceResponse::new(event_id, &status)))
}
