//! `ldcm secrets`: list the secrets of one environment.

use crate::cli::output::{self, SecretRow, MASK};
use crate::cli::{resolve_environment, unlock_session, Cli};
use crate::errors::Result;

/// Execute the `secrets` command.
pub fn execute(cli: &Cli, project: &str, env: &str, reveal: bool) -> Result<()> {
    let (_settings, mut session) = unlock_session(cli)?;
    let (project, environment) = resolve_environment(&session, project, env)?;

    let secrets = session.get_secrets(environment.id)?;
    if secrets.is_empty() {
        output::info(&format!(
            "No secrets in {}/{}.",
            project.name, environment.name
        ));
        output::tip(&format!(
            "Add one with `ldcm secret-add {} {} <KEY>`.",
            project.name, environment.name
        ));
        return Ok(());
    }

    let mut rows = Vec::with_capacity(secrets.len());
    for secret in secrets {
        let value = if reveal {
            session.decrypt_secret(&secret.encrypted_value)?
        } else {
            MASK.to_string()
        };
        rows.push(SecretRow {
            id: secret.id,
            key: secret.key,
            value,
            expires: secret
                .expires_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
        });
    }

    output::print_secrets_table(&rows);
    Ok(())
}
