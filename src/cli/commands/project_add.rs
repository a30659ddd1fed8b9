//! `ldcm project-add`: create a project with the default environments.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{LdcmError, Result};
use crate::vault::DEFAULT_ENVIRONMENTS;

/// Execute the `project-add` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LdcmError::CommandFailed("project name cannot be empty".into()));
    }

    let (_settings, mut session) = unlock_session(cli)?;
    let project = session.create_project(name)?;

    output::success(&format!(
        "Project '{}' created (id {}) with environments: {}",
        project.name,
        project.id,
        DEFAULT_ENVIRONMENTS.join(", ")
    ));
    Ok(())
}
