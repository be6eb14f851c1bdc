// SPDX-License-Identifier: MIT

use investsync_api::config::Config;
use investsync_api::db::FirestoreDb;
use investsync_api::routes::create_router;
use investsync_api::services::{AttendanceService, EventRegistry};
use investsync_api::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build the app around a given database connection.
#[allow(dead_code)]
pub fn create_test_app_with_db(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();

    let state = Arc::new(AppState {
        config,
        registry: EventRegistry::new(db.clone()),
        attendance: AttendanceService::new(db.clone()),
        db,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an offline mock database.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_db(test_db_offline())
}

/// Create a session JWT signed with the test config's key.
#[allow(dead_code)]
pub fn test_jwt(uid: &str) -> String {
    let config = Config::test_default();
    investsync_api::middleware::auth::create_jwt(uid, &config.jwt_signing_key)
        .expect("JWT creation should succeed")
}
