//! Records persisted by the secret store.
//!
//! `Secret::encrypted_value` is the base64 AES-GCM blob produced by
//! `crypto::cipher`; plaintext never reaches this layer.

use chrono::{DateTime, Utc};

/// The stored master password hash and salt. At most one per vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterCredential {
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
}

/// A single encrypted secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub id: i64,
    pub environment_id: i64,
    /// The variable name (e.g. "DATABASE_URL"). Not unique per environment.
    pub key: String,
    pub encrypted_value: String,
    pub created_at: DateTime<Utc>,
    /// Recorded but not enforced.
    pub expires_at: Option<DateTime<Utc>>,
}
