//! The vault session: master password handling and every operation that
//! touches secret records.
//!
//! A session starts `Locked`. `initialize` or `unlock` derive the vault key
//! and move it into the session's `SecretCipher`; `lock` zeroes it again.
//! Secret operations check the state before doing any work, while project
//! and environment operations only touch metadata and work in either state.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::crypto::{self, Argon2Params, SecretCipher};
use crate::errors::{LdcmError, Result};
use crate::store::{Environment, MasterCredential, Project, Secret, SecretStore};

use super::secrets::SecretMap;

/// Environments created with every new project.
pub const DEFAULT_ENVIRONMENTS: [&str; 3] = ["dev", "staging", "test"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    Locked,
    Unlocked,
}

/// Tunables for hashing, key derivation and idle locking.
#[derive(Debug, Clone, Copy)]
pub struct VaultOptions {
    pub argon2: Argon2Params,
    pub pbkdf2_iterations: u32,
    /// Idle window after which `lock_if_idle` locks. `None` disables it.
    pub auto_lock: Option<Duration>,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            argon2: Argon2Params::default(),
            pbkdf2_iterations: crypto::MIN_PBKDF2_ITERATIONS,
            auto_lock: Some(Duration::from_secs(5 * 60)),
        }
    }
}

/// A session shared between threads. Every state transition and key use
/// goes through the one mutex.
pub type SharedVault<S> = Arc<Mutex<VaultSession<S>>>;

pub struct VaultSession<S: SecretStore> {
    store: S,
    cipher: SecretCipher,
    state: VaultState,
    options: VaultOptions,
    last_activity: Instant,
}

impl<S: SecretStore> VaultSession<S> {
    pub fn new(store: S, options: VaultOptions) -> Self {
        Self {
            store,
            cipher: SecretCipher::new(),
            state: VaultState::Locked,
            options,
            last_activity: Instant::now(),
        }
    }

    pub fn into_shared(self) -> SharedVault<S> {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    pub fn state(&self) -> VaultState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == VaultState::Unlocked
    }

    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.master_credential()?.is_some())
    }

    /// Create the master credential and unlock.
    pub fn initialize(&mut self, password: &str) -> Result<()> {
        if self.is_initialized()? {
            return Err(LdcmError::AlreadyInitialized);
        }

        let (password_hash, salt) = crypto::hash_password(password, &self.options.argon2)?;
        let key = crypto::derive_key(password, &salt, self.options.pbkdf2_iterations)?;

        self.store.insert_master_credential(&MasterCredential {
            password_hash,
            salt,
            created_at: Utc::now(),
        })?;

        self.cipher.load_key(key);
        self.state = VaultState::Unlocked;
        self.touch();
        info!("vault initialized");
        Ok(())
    }

    /// Verify the master password and load the vault key.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        let credential = self
            .store
            .master_credential()?
            .ok_or(LdcmError::NotInitialized)?;

        if !crypto::verify_password(password, &credential.password_hash, &credential.salt) {
            warn!("unlock rejected: wrong master password");
            return Err(LdcmError::AuthenticationFailed);
        }

        let key = crypto::derive_key(password, &credential.salt, self.options.pbkdf2_iterations)?;
        self.cipher.load_key(key);
        self.state = VaultState::Unlocked;
        self.touch();
        info!("vault unlocked");
        Ok(())
    }

    /// Zero the key and lock. Safe to call when already locked.
    pub fn lock(&mut self) {
        self.cipher.clear_key();
        if self.state == VaultState::Unlocked {
            info!("vault locked");
        }
        self.state = VaultState::Locked;
    }

    /// Lock if the session has been idle past the configured window.
    /// Returns `true` if this call locked the vault.
    pub fn lock_if_idle(&mut self) -> bool {
        self.lock_if_idle_at(Instant::now())
    }

    pub fn lock_if_idle_at(&mut self, now: Instant) -> bool {
        let Some(window) = self.options.auto_lock else {
            return false;
        };
        if !self.is_unlocked() || now.saturating_duration_since(self.last_activity) < window {
            return false;
        }
        debug!(idle_secs = window.as_secs(), "idle window elapsed");
        self.lock();
        true
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn require_unlocked(&mut self) -> Result<()> {
        self.lock_if_idle();
        if !self.is_unlocked() {
            return Err(LdcmError::VaultLocked);
        }
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Projects and environments
    // ------------------------------------------------------------------

    /// Create a project with the `dev`, `staging` and `test` environments.
    pub fn create_project(&mut self, name: &str) -> Result<Project> {
        let project = self.store.insert_project(name, &DEFAULT_ENVIRONMENTS)?;
        info!(project_id = project.id, "project created");
        Ok(project)
    }

    pub fn get_projects(&self) -> Result<Vec<Project>> {
        self.store.projects()
    }

    pub fn get_environments(&self, project_id: i64) -> Result<Vec<Environment>> {
        self.store.environments(project_id)
    }

    /// Delete a project and all of its environments and secrets.
    pub fn delete_project(&mut self, project_id: i64) -> Result<()> {
        self.store.delete_project(project_id)?;
        info!(project_id, "project deleted");
        Ok(())
    }

    pub fn project(&self, project_id: i64) -> Result<Project> {
        self.store
            .project(project_id)?
            .ok_or_else(|| LdcmError::not_found("Project", project_id.to_string()))
    }

    /// First project with the given name.
    pub fn find_project(&self, name: &str) -> Result<Project> {
        self.store
            .projects()?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| LdcmError::not_found("Project", name))
    }

    pub fn find_environment(&self, project_id: i64, name: &str) -> Result<Environment> {
        self.store
            .environments(project_id)?
            .into_iter()
            .find(|e| e.name == name)
            .ok_or_else(|| LdcmError::not_found("Environment", name))
    }

    // ------------------------------------------------------------------
    // Secrets (require Unlocked)
    // ------------------------------------------------------------------

    pub fn add_secret(
        &mut self,
        environment_id: i64,
        key: &str,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Secret> {
        self.require_unlocked()?;
        if self.store.environment(environment_id)?.is_none() {
            return Err(LdcmError::not_found("Environment", environment_id.to_string()));
        }

        let encrypted_value = self.cipher.encrypt(value)?;
        let secret = self
            .store
            .insert_secret(environment_id, key, &encrypted_value, expires_at)?;
        info!(secret_id = secret.id, environment_id, "secret added");
        Ok(secret)
    }

    /// Stored records, still encrypted.
    pub fn get_secrets(&mut self, environment_id: i64) -> Result<Vec<Secret>> {
        self.require_unlocked()?;
        self.store.secrets(environment_id)
    }

    pub fn decrypt_secret(&mut self, encrypted_value: &str) -> Result<String> {
        self.require_unlocked()?;
        self.cipher.decrypt(encrypted_value)
    }

    /// Decrypt every secret of an environment, in stored order.
    pub fn decrypt_all(&mut self, environment_id: i64) -> Result<SecretMap> {
        self.require_unlocked()?;
        let mut map = SecretMap::new();
        for secret in self.store.secrets(environment_id)? {
            let value = self.cipher.decrypt(&secret.encrypted_value)?;
            map.insert(secret.key, value);
        }
        Ok(map)
    }

    /// Rename and/or re-encrypt a secret. Empty or absent fields are left
    /// untouched.
    pub fn update_secret(&mut self, id: i64, key: Option<&str>, value: Option<&str>) -> Result<()> {
        self.require_unlocked()?;
        if self.store.secret(id)?.is_none() {
            return Err(LdcmError::not_found("Secret", id.to_string()));
        }

        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.store.update_secret_key(id, key)?;
        }
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let encrypted_value = self.cipher.encrypt(value)?;
            self.store.update_secret_value(id, &encrypted_value)?;
        }
        info!(secret_id = id, "secret updated");
        Ok(())
    }

    /// Remove a secret. Unknown ids are not an error.
    pub fn delete_secret(&mut self, id: i64) -> Result<()> {
        self.require_unlocked()?;
        self.store.delete_secret(id)?;
        info!(secret_id = id, "secret deleted");
        Ok(())
    }
}

impl<S: SecretStore> Drop for VaultSession<S> {
    fn drop(&mut self) {
        self.cipher.clear_key();
    }
}
