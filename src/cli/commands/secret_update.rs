//! `ldcm secret-update`: rename a secret and/or replace its value.

use crate::cli::output;
use crate::cli::{unlock_session, Cli};
use crate::errors::{LdcmError, Result};

/// Execute the `secret-update` command.
pub fn execute(cli: &Cli, id: i64, key: Option<&str>, value: Option<&str>) -> Result<()> {
    if key.is_none() && value.is_none() {
        return Err(LdcmError::CommandFailed(
            "nothing to update — pass --key and/or --value".into(),
        ));
    }

    let (_settings, mut session) = unlock_session(cli)?;
    session.update_secret(id, key, value)?;

    output::success(&format!("Updated secret {id}"));
    Ok(())
}
