// SPDX-License-Identifier: MIT

//! Event registry - admin CRUD over event records.
//!
//! Create and edit share the same derivation rules: the category maps to a
//! fixed display gradient, and the date/time form inputs are expanded into
//! cached display strings plus the canonical sortable instant (see
//! [`crate::schedule`]).

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Category, Event, EventForm};
use crate::schedule;
use validator::Validate;

/// Service for event CRUD.
#[derive(Clone)]
pub struct EventRegistry {
    db: FirestoreDb,
}

impl EventRegistry {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create a new event from validated form input.
    ///
    /// Admin gating happens at the route boundary before this is invoked.
    pub async fn create(&self, form: EventForm) -> Result<Event> {
        let event = build_event(uuid::Uuid::new_v4().to_string(), form, Default::default())?;

        self.db.upsert_event(&event).await?;

        tracing::info!(
            event_id = %event.id,
            title = %event.title,
            category = ?event.category,
            "Event created"
        );

        Ok(event)
    }

    /// Edit an existing event. Overwrites all literal and derived fields;
    /// the attendee map is carried over verbatim, never partially merged.
    pub async fn edit(&self, event_id: &str, form: EventForm) -> Result<Event> {
        let existing = self
            .db
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

        let event = build_event(existing.id, form, existing.attendees)?;
        self.db.upsert_event(&event).await?;

        tracing::info!(event_id = %event.id, "Event updated");

        Ok(event)
    }

    /// Delete an event and all of its attendee state. Irreversible.
    pub async fn delete(&self, event_id: &str) -> Result<()> {
        // Surface a 404 rather than silently succeeding on a stale id
        if self.db.get_event(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Event {} not found", event_id)));
        }

        self.db.delete_event(event_id).await?;

        tracing::info!(event_id, "Event deleted");

        Ok(())
    }

    /// Get a single event.
    pub async fn get(&self, event_id: &str) -> Result<Event> {
        self.db
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    /// List all events, ascending by the canonical instant.
    pub async fn list(&self) -> Result<Vec<Event>> {
        self.db.list_events().await
    }
}

/// Apply the shared create/edit derivation rules to a form.
fn build_event(
    id: String,
    form: EventForm,
    attendees: std::collections::HashMap<String, crate::models::AttendeeStatus>,
) -> Result<Event> {
    form.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let schedule = schedule::derive(&form.date_input, &form.time_input, form.utc_offset_minutes)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let category = Category::parse(&form.category);

    Ok(Event {
        id,
        title: form.title,
        subtitle: form.subtitle,
        location: form.location,
        description: form.description,
        category,
        color: category.gradient().to_string(),
        date: schedule.display_date,
        time: schedule.display_time,
        sortable_date: schedule.starts_at,
        attendees,
    })
}
