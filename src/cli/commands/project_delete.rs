//! `ldcm project-delete`: remove a project with all its environments and secrets.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{LdcmError, Result};

/// Execute the `project-delete` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    let (_settings, mut session) = unlock_session(cli)?;
    let project = session.project(id)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete project '{}' ({id}) and all of its secrets?",
                project.name
            ))
            .default(false)
            .interact()
            .map_err(|e| LdcmError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.delete_project(id)?;
    output::success(&format!("Deleted project '{}' ({id})", project.name));
    Ok(())
}
