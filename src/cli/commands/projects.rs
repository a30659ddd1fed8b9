//! `ldcm projects`: list projects and their environments.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::Result;

/// Execute the `projects` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, session) = unlock_session(cli)?;

    let mut rows = Vec::new();
    for project in session.get_projects()? {
        let envs = session.get_environments(project.id)?;
        rows.push((project, envs));
    }

    output::print_projects_table(&rows);
    Ok(())
}
