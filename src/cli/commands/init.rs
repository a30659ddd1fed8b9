//! `ldcm init`: create the master credential for a new vault.

use crate::cli::output;
use crate::cli::{data_dir, open_session, prompt_new_password, Cli};
use crate::errors::{LdcmError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, mut session) = open_session(cli)?;

    // Refuse before prompting so a second init never asks for a password.
    if session.is_initialized()? {
        output::tip("Use `ldcm projects` to see what is already in the vault.");
        return Err(LdcmError::AlreadyInitialized);
    }

    let password = prompt_new_password()?;
    session.initialize(&password)?;

    output::success(&format!(
        "Vault initialized in {}",
        data_dir(cli).display()
    ));
    output::tip("Create a project: ldcm project-add <name>");
    Ok(())
}
