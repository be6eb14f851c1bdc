//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

/// Role held by a user. Assigned out-of-band; there is no in-app
/// escalation path. Unrecognized role strings fail deserialization at the
/// store boundary rather than being carried as untyped data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

/// User profile stored in Firestore, keyed by the identity provider's uid.
/// Created implicitly on first write; both fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Self-reported display name (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}
