// SPDX-License-Identifier: MIT

//! Event model, category styling, and the attendee state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Event category. Each category maps to a fixed display gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tech,
    Sport,
    Music,
}

impl Category {
    /// Parse a form value. Unknown input falls back to tech, matching the
    /// product's original behavior for the category selector.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sport" => Category::Sport,
            "music" => Category::Music,
            _ => Category::Tech,
        }
    }

    /// The display gradient identifier for this category.
    pub fn gradient(&self) -> &'static str {
        match self {
            Category::Tech => "from-pink-500 via-purple-600 to-indigo-800",
            Category::Sport => "from-blue-500 via-indigo-600 to-purple-800",
            Category::Music => "from-yellow-400 to-orange-500",
        }
    }
}

/// Per-user attendance status embedded in an event's attendee map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeStatus {
    pub registered: bool,
    pub attended: bool,
    /// Set when attendance is confirmed by a check-in scan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended_timestamp: Option<DateTime<Utc>>,
}

impl AttendeeStatus {
    /// Fresh registration entry.
    pub fn registered() -> Self {
        Self {
            registered: true,
            attended: false,
            attended_timestamp: None,
        }
    }

    /// Registration transition: Unregistered -> Registered.
    ///
    /// Returns `None` when there is nothing to persist: registering a user
    /// who is already Registered or Attended is a no-op. In particular it
    /// must never clear `attended`.
    pub fn register(existing: Option<&AttendeeStatus>) -> Option<AttendeeStatus> {
        match existing {
            Some(status) if status.registered => None,
            // An entry with registered=false should not exist, but if one
            // does, promote it to Registered without touching `attended`.
            Some(status) => Some(AttendeeStatus {
                registered: true,
                ..status.clone()
            }),
            None => Some(AttendeeStatus::registered()),
        }
    }

    /// Check-in transition: Registered -> Attended.
    ///
    /// Fails for a missing entry or one with `registered == false`; an
    /// unregistered user is never silently promoted to Attended. Checking in
    /// an already-Attended user re-applies the same state with a fresh
    /// timestamp.
    pub fn check_in(
        existing: Option<&AttendeeStatus>,
        now: DateTime<Utc>,
    ) -> Result<AttendeeStatus, NotRegistered> {
        match existing {
            Some(status) if status.registered => Ok(AttendeeStatus {
                registered: true,
                attended: true,
                attended_timestamp: Some(now),
            }),
            _ => Err(NotRegistered),
        }
    }
}

/// Check-in precondition failure: no registered attendee entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("not registered for this event")]
pub struct NotRegistered;

/// Event record stored in Firestore (document ID mirrored in `id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Document ID (UUID)
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub location: String,
    pub description: String,
    pub category: Category,
    /// Display gradient derived from `category`
    pub color: String,
    /// Display date, e.g. "SUNDAY, JULY 21" (cached at write time)
    pub date: String,
    /// Display time, e.g. "11:00 AM" (cached at write time)
    pub time: String,
    /// Canonical instant; the only field used for ordering
    pub sortable_date: DateTime<Utc>,
    /// Attendee map: user id -> status
    #[serde(default)]
    pub attendees: HashMap<String, AttendeeStatus>,
}

/// Form payload for creating or editing an event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventForm {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "subtitle is required"))]
    pub subtitle: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// tech | sport | music (unknown values fall back to tech)
    #[serde(default)]
    pub category: String,
    /// Calendar-picker date, YYYY-MM-DD
    #[validate(length(min = 1, message = "date_input is required"))]
    pub date_input: String,
    /// 24-hour time, HH:MM
    #[validate(length(min = 1, message = "time_input is required"))]
    pub time_input: String,
    /// Writer's UTC offset in minutes (east positive)
    #[serde(default)]
    pub utc_offset_minutes: i32,
}
