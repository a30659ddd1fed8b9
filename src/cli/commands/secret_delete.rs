//! `ldcm secret-delete`: remove a secret by id.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::Result;

/// Execute the `secret-delete` command.
pub fn execute(cli: &Cli, id: i64) -> Result<()> {
    let (_settings, mut session) = unlock_session(cli)?;
    session.delete_secret(id)?;

    output::success(&format!("Deleted secret {id}"));
    Ok(())
}
