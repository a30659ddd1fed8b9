//! `ldcm secret-copy`: put one decrypted value on the system clipboard.

use crate::cli::output;
use crate::cli::{resolve_environment, unlock_session, Cli};
use crate::errors::{LdcmError, Result};

/// Execute the `secret-copy` command.
pub fn execute(cli: &Cli, project: &str, env: &str, key: &str) -> Result<()> {
    let (_settings, mut session) = unlock_session(cli)?;
    let (_project, environment) = resolve_environment(&session, project, env)?;

    let secrets = session.decrypt_all(environment.id)?;
    let value = secrets
        .get(key)
        .ok_or_else(|| LdcmError::not_found("Secret", key))?;

    copy_to_clipboard(value)?;
    output::success(&format!("Copied '{key}' to clipboard"));
    Ok(())
}

pub(crate) fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| LdcmError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| LdcmError::CommandFailed(format!("clipboard write failed: {e}")))
}
