use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::{Argon2Params, MIN_PBKDF2_ITERATIONS};
use crate::errors::{LdcmError, Result};
use crate::vault::VaultOptions;

/// Vault configuration, loaded from `config.toml` in the data directory.
///
/// Every field has a sensible default so LDCM works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File name of the SQLite vault inside the data directory.
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// PBKDF2 rounds for the encryption key (default and minimum: 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Idle minutes before an unlocked session locks itself (0 = never).
    #[serde(default = "default_auto_lock_minutes")]
    pub auto_lock_minutes: u64,

    /// Terminal emulator for `inject` without `--command`.
    #[serde(default)]
    pub terminal: Option<String>,

    /// Default log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_database_name() -> String {
    "ldcm_vault.db".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_pbkdf2_iterations() -> u32 {
    MIN_PBKDF2_ITERATIONS
}

fn default_auto_lock_minutes() -> u64 {
    5
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// `~/.ldcm`, falling back to `./.ldcm` when no home directory is set.
pub fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".ldcm")
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_name: default_database_name(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            auto_lock_minutes: default_auto_lock_minutes(),
            terminal: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<data_dir>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LdcmError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.pbkdf2_iterations < MIN_PBKDF2_ITERATIONS {
            return Err(LdcmError::Config(format!(
                "pbkdf2_iterations must be at least {MIN_PBKDF2_ITERATIONS} (got {})",
                settings.pbkdf2_iterations
            )));
        }

        if settings.auto_lock_minutes.checked_mul(60).is_none() {
            return Err(LdcmError::Config(format!(
                "auto_lock_minutes is too large (got {})",
                settings.auto_lock_minutes
            )));
        }

        Ok(settings)
    }

    /// Full path to the vault database.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_name)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Session tunables derived from these settings.
    pub fn vault_options(&self) -> VaultOptions {
        VaultOptions {
            argon2: self.argon2_params(),
            pbkdf2_iterations: self.pbkdf2_iterations,
            auto_lock: (self.auto_lock_minutes > 0)
                .then(|| Duration::from_secs(self.auto_lock_minutes.saturating_mul(60))),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
