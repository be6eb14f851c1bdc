// SPDX-License-Identifier: MIT

//! Event schedule derivation from form inputs.
//!
//! Events are entered with a calendar-picker date (`YYYY-MM-DD`) and a
//! 24-hour time (`HH:MM`). From those we derive three stored values:
//! the display date (`SUNDAY, JULY 21`), the display time (`11:00 AM`),
//! and the canonical UTC instant used for chronological ordering.
//!
//! The display strings are cached at write time and never recomputed from
//! the instant; editing an event re-derives and overwrites both.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

/// Derived schedule fields for an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSchedule {
    /// Display date, e.g. "SUNDAY, JULY 21"
    pub display_date: String,
    /// Display time, e.g. "11:00 AM"
    pub display_time: String,
    /// Canonical instant for ordering
    pub starts_at: DateTime<Utc>,
}

/// Schedule derivation errors.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid date input (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("invalid time input (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),

    #[error("date/time does not exist at the given offset")]
    NonexistentLocalTime,
}

/// Derive display strings and the sortable instant from raw form inputs.
///
/// The server cannot observe the writer's time zone, so the client submits
/// its UTC offset in minutes (east positive). Display strings come from the
/// local wall-clock inputs; the sortable instant is that wall-clock time
/// shifted to UTC.
pub fn derive(
    date_input: &str,
    time_input: &str,
    utc_offset_minutes: i32,
) -> Result<EventSchedule, ScheduleError> {
    let date = NaiveDate::parse_from_str(date_input.trim(), "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(date_input.to_string()))?;
    let time = NaiveTime::parse_from_str(time_input.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(time_input.to_string()))?;

    // Request-supplied; unchecked multiplication can wrap back into
    // east_opt's valid range and silently shift the sortable instant
    let offset = utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(ScheduleError::InvalidOffset(utc_offset_minutes))?;

    let local = date.and_time(time);
    let starts_at = local
        .and_local_timezone(offset)
        .single()
        .ok_or(ScheduleError::NonexistentLocalTime)?
        .with_timezone(&Utc);

    // %-d / %-I suppress zero padding: "JULY 7", "9:05 AM"
    let display_date = local.format("%A, %B %-d").to_string().to_uppercase();
    let display_time = local.format("%-I:%M %p").to_string();

    Ok(EventSchedule {
        display_date,
        display_time,
        starts_at,
    })
}
