//! Secret store: persistence of vault records.
//!
//! This module provides:
//! - Record types (`models`)
//! - The `SecretStore` trait the vault session is written against
//! - A SQLite implementation (`sqlite`)

pub mod models;
pub mod sqlite;

pub use models::{Environment, MasterCredential, Project, Secret};
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::errors::Result;

/// CRUD interface over the vault's four record kinds.
///
/// Implementations must delete a project's environments and their
/// secrets together with the project.
pub trait SecretStore {
    fn master_credential(&self) -> Result<Option<MasterCredential>>;

    fn insert_master_credential(&mut self, credential: &MasterCredential) -> Result<()>;

    /// Create a project together with the named environments.
    fn insert_project(&mut self, name: &str, environments: &[&str]) -> Result<Project>;

    fn projects(&self) -> Result<Vec<Project>>;

    fn project(&self, id: i64) -> Result<Option<Project>>;

    /// Delete a project and everything it owns. Missing ids are ignored.
    fn delete_project(&mut self, id: i64) -> Result<()>;

    fn environments(&self, project_id: i64) -> Result<Vec<Environment>>;

    fn environment(&self, id: i64) -> Result<Option<Environment>>;

    fn insert_secret(
        &mut self,
        environment_id: i64,
        key: &str,
        encrypted_value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Secret>;

    /// Secrets of one environment, in insertion order.
    fn secrets(&self, environment_id: i64) -> Result<Vec<Secret>>;

    fn secret(&self, id: i64) -> Result<Option<Secret>>;

    fn update_secret_key(&mut self, id: i64, key: &str) -> Result<()>;

    fn update_secret_value(&mut self, id: i64, encrypted_value: &str) -> Result<()>;

    /// Missing ids are ignored.
    fn delete_secret(&mut self, id: i64) -> Result<()>;
}
