// SPDX-License-Identifier: MIT

//! Registration and attendance workflow.
//!
//! Per (event, user) pair this drives a three-state machine: no attendee
//! entry (unregistered), registered, and attended (terminal). The pure
//! transitions live on [`AttendeeStatus`]; this service wires them to
//! Firestore as single-document field merges of the attendee map. No
//! transition ever moves backward; only event deletion removes attendee
//! state.

use chrono::{DateTime, Utc};

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{AttendeeStatus, CheckInPayload, Event};

/// Service for the register / check-in workflow.
#[derive(Clone)]
pub struct AttendanceService {
    db: FirestoreDb,
}

impl AttendanceService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Register the user for an event.
    ///
    /// Registering an already-registered or already-attended user is a
    /// no-op: nothing is written, and in particular `attended` is never
    /// cleared. Returns the attendee entry after the operation.
    pub async fn register(&self, event_id: &str, uid: &str) -> Result<AttendeeStatus> {
        let mut event = self.load_event(event_id).await?;

        match AttendeeStatus::register(event.attendees.get(uid)) {
            Some(entry) => {
                event.attendees.insert(uid.to_string(), entry.clone());
                self.db.merge_attendees(&event).await?;

                tracing::info!(event_id, uid, "Attendee registered");
                Ok(entry)
            }
            None => {
                tracing::debug!(event_id, uid, "Register no-op (already registered)");
                // The entry exists whenever the transition declines to write
                Ok(event.attendees.get(uid).cloned().unwrap_or_else(AttendeeStatus::registered))
            }
        }
    }

    /// Confirm attendance for a registered user.
    ///
    /// Preconditions, in order: the event exists; the user holds a
    /// registered attendee entry. An unregistered user fails with
    /// [`AppError::NotRegistered`] and the attendee map is left untouched.
    /// Re-checking-in an attended user re-applies the same state with a
    /// fresh timestamp.
    pub async fn check_in(
        &self,
        event_id: &str,
        uid: &str,
        now: DateTime<Utc>,
    ) -> Result<AttendeeStatus> {
        let mut event = self.load_event(event_id).await?;

        let entry = AttendeeStatus::check_in(event.attendees.get(uid), now)
            .map_err(|_| AppError::NotRegistered)?;

        event.attendees.insert(uid.to_string(), entry.clone());
        self.db.merge_attendees(&event).await?;

        tracing::info!(event_id, uid, "Attendance confirmed");

        Ok(entry)
    }

    /// Handle a scanned QR payload string for the current user.
    ///
    /// Decode failures abort before any store access, so a malformed scan
    /// can never cause a partial transition.
    pub async fn check_in_scan(
        &self,
        raw_payload: &str,
        uid: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, AttendeeStatus)> {
        let payload = CheckInPayload::decode(raw_payload)
            .map_err(|e| AppError::BadRequest(format!("Invalid QR code: {}", e)))?;

        let entry = self.check_in(&payload.event_id, uid, now).await?;
        Ok((payload.event_id, entry))
    }

    async fn load_event(&self, event_id: &str) -> Result<Event> {
        self.db
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }
}
