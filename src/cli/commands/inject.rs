//! `ldcm inject`: run a command (or open a terminal) with an
//! environment's secrets in its process environment.

use std::io::Write;
use std::path::Path;

use crate::cli::output;
use crate::cli::{resolve_environment, unlock_session, Cli};
use crate::errors::{LdcmError, Result};
use crate::inject::{open_interactive, run_with_secrets};

/// Execute the `inject` command.
pub fn execute(cli: &Cli, project: &str, env: &str, command: Option<&str>, dir: Option<&Path>) -> Result<()> {
    let (settings, mut session) = unlock_session(cli)?;
    let (project, environment) = resolve_environment(&session, project, env)?;

    let secrets = session.decrypt_all(environment.id)?;
    // The key is not needed once the values are in hand.
    session.lock();

    if secrets.is_empty() {
        output::warning(&format!(
            "No secrets in {}/{}; running without injected variables.",
            project.name, environment.name
        ));
    }

    match command {
        Some(command) => {
            let result = run_with_secrets(&secrets, command, dir)?;
            std::io::stdout().write_all(result.stdout.as_bytes())?;
            std::io::stderr().write_all(result.stderr.as_bytes())?;

            if !result.success() {
                // Terminated by a signal has no code; report it as 1.
                return Err(LdcmError::ChildProcessFailed(result.exit_code.unwrap_or(1)));
            }
        }
        None => {
            open_interactive(&secrets, None, dir, settings.terminal.as_deref())?;
            output::success(&format!(
                "Opened terminal with {} secrets from {}/{}",
                secrets.len(),
                project.name,
                environment.name
            ));
        }
    }

    Ok(())
}
