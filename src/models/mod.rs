// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod checkin;
pub mod event;
pub mod user;

pub use checkin::CheckInPayload;
pub use event::{AttendeeStatus, Category, Event, EventForm};
pub use user::{Role, User};
