//! `ldcm secret-add`: encrypt and store a new secret.

use std::io::{self, IsTerminal, Read};

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{resolve_environment, unlock_session, Cli};
use crate::errors::{LdcmError, Result};

/// Execute the `secret-add` command.
pub fn execute(
    cli: &Cli,
    project: &str,
    env: &str,
    key: &str,
    value: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    if key.is_empty() {
        return Err(LdcmError::CommandFailed("secret key cannot be empty".into()));
    }

    let (_settings, mut session) = unlock_session(cli)?;
    let (project, environment) = resolve_environment(&session, project, env)?;

    let secret_value = read_value(key, value)?;
    let secret = session.add_secret(environment.id, key, &secret_value, expires_at)?;

    output::success(&format!(
        "Secret '{}' added to {}/{} (id {})",
        secret.key, project.name, environment.name, secret.id
    ));
    Ok(())
}

/// Inline value, piped stdin, or an interactive hidden prompt.
pub(crate) fn read_value(key: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut *buf)?;
        let trimmed = buf.trim_end().len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    let v = dialoguer::Password::new()
        .with_prompt(format!("Enter value for {key}"))
        .interact()
        .map_err(|e| LdcmError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(v))
}
