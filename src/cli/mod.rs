//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{default_data_dir, Settings};
use crate::errors::{LdcmError, Result};
use crate::store::{Environment, Project, SqliteStore};
use crate::vault::VaultSession;

/// Minimum password length to prevent trivially weak passwords.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "LDCM_PASSWORD";

/// LDCM: Local Developer Credentials Manager.
#[derive(Parser)]
#[command(
    name = "ldcm",
    about = "Local Developer Credentials Manager - secure credential management for developers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the vault database and config.toml (default: ~/.ldcm)
    #[arg(long, env = "LDCM_HOME", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init,

    /// List all projects
    Projects,

    /// Add a new project (with dev, staging and test environments)
    ProjectAdd {
        /// Project name
        name: String,
    },

    /// Delete a project and all of its secrets
    ProjectDelete {
        /// Project ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List secrets
    Secrets {
        /// Project name
        project: String,
        /// Environment (dev/staging/test)
        env: String,
        /// Show secret values
        #[arg(short, long)]
        reveal: bool,
    },

    /// Add a secret
    SecretAdd {
        /// Project name
        project: String,
        /// Environment
        env: String,
        /// Secret key (e.g. DATABASE_URL)
        key: String,
        /// Secret value (prompted if not provided)
        #[arg(short = 'v', long)]
        value: Option<String>,
        /// Expiry timestamp, RFC 3339 (recorded only)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
    },

    /// Rename a secret and/or change its value
    SecretUpdate {
        /// Secret ID
        id: i64,
        /// New key
        #[arg(short, long)]
        key: Option<String>,
        /// New value
        #[arg(short = 'v', long)]
        value: Option<String>,
    },

    /// Delete a secret
    SecretDelete {
        /// Secret ID
        id: i64,
    },

    /// Copy a secret's value to the clipboard
    SecretCopy {
        /// Project name
        project: String,
        /// Environment
        env: String,
        /// Secret key
        key: String,
    },

    /// Inject secrets into a command or a new terminal
    Inject {
        /// Project name
        project: String,
        /// Environment
        env: String,
        /// Command to run with secrets
        #[arg(short, long)]
        command: Option<String>,
        /// Working directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Export secrets
    Export {
        /// Project name
        project: String,
        /// Environment
        env: String,
        /// Output format: env, shell, cmd, powershell or docker
        #[arg(short, long, default_value = "env")]
        format: String,
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Copy the rendered output to the clipboard instead of printing it
        #[arg(long, conflicts_with = "output")]
        copy: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the data directory from `--data-dir` / `LDCM_HOME` or the default.
pub fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(default_data_dir)
}

/// Open the vault database (creating the data directory if needed).
///
/// The returned session is still locked.
pub fn open_session(cli: &Cli) -> Result<(Settings, VaultSession<SqliteStore>)> {
    let dir = data_dir(cli);
    std::fs::create_dir_all(&dir)?;

    let settings = Settings::load(&dir)?;
    let store = SqliteStore::open(&settings.database_path(&dir))?;
    let session = VaultSession::new(store, settings.vault_options());
    Ok((settings, session))
}

/// Open the vault and unlock it with the master password.
pub fn unlock_session(cli: &Cli) -> Result<(Settings, VaultSession<SqliteStore>)> {
    let (settings, mut session) = open_session(cli)?;
    if !session.is_initialized()? {
        return Err(LdcmError::NotInitialized);
    }

    let password = prompt_password()?;
    session.unlock(&password)?;
    Ok((settings, session))
}

/// Find a project and one of its environments by name.
pub fn resolve_environment(
    session: &VaultSession<SqliteStore>,
    project: &str,
    env: &str,
) -> Result<(Project, Environment)> {
    let project = session.find_project(project)?;
    let environment = session.find_environment(project.id, env)?;
    Ok((project, environment))
}

/// Get the master password, trying in order:
/// 1. `LDCM_PASSWORD` env var (CI/CD)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master Password")
        .interact()
        .map_err(|e| LdcmError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password twice (used during `init`).
///
/// Also respects `LDCM_PASSWORD` for scripted/CI usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            let pw = Zeroizing::new(pw);
            check_new_password(&pw, &pw)?;
            return Ok(pw);
        }
    }

    let password = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Create Master Password")
            .interact()
            .map_err(|e| LdcmError::CommandFailed(format!("password prompt: {e}")))?,
    );
    let confirm = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Confirm Password")
            .interact()
            .map_err(|e| LdcmError::CommandFailed(format!("password prompt: {e}")))?,
    );

    check_new_password(&password, &confirm)?;
    Ok(password)
}

/// Reject mismatched confirmations and passwords shorter than
/// `MIN_PASSWORD_LEN` characters.
pub fn check_new_password(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(LdcmError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LdcmError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}
