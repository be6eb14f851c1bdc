// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, role lookups)
//! - Events (records with embedded attendee maps)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Event, User};
use firestore::{paths, FirestoreQueryDirection};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by identity-provider uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a user profile. Role assignment happens
    /// out-of-band (ops tooling, emulator seeding); there is no in-app
    /// escalation path.
    pub async fn upsert_user(&self, uid: &str, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Set a user's self-reported real name, merging into the existing
    /// document (created implicitly if absent).
    pub async fn merge_real_name(&self, uid: &str, real_name: &str) -> Result<(), AppError> {
        let user = User {
            real_name: Some(real_name.to_string()),
            role: None,
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths!(User::{real_name}))
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Get an event by document ID.
    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EVENTS)
            .obj()
            .one(event_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or fully overwrite an event document.
    pub async fn upsert_event(&self, event: &Event) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EVENTS)
            .document_id(&event.id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Merge only the attendee map of an event (single-document atomic
    /// field write; all other fields are left untouched).
    pub async fn merge_attendees(&self, event: &Event) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths!(Event::{attendees}))
            .in_col(collections::EVENTS)
            .document_id(&event.id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an event document, including all attendee state. Irreversible.
    pub async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EVENTS)
            .document_id(event_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all events ascending by their canonical instant.
    ///
    /// `sortable_date` is stored as RFC3339 UTC, so lexical store order is
    /// chronological. Ties fall back to storage-native order.
    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::EVENTS)
            .order_by([("sortable_date", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
