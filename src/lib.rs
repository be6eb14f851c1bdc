// SPDX-License-Identifier: MIT

//! InvestSync Events API
//!
//! Backend for the InvestSync community-events app: event feed, attendance
//! registration, QR-driven check-in, and admin CRUD over events, backed by
//! Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{AttendanceService, EventRegistry};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub registry: EventRegistry,
    pub attendance: AttendanceService,
}
