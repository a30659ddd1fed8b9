//! `ldcm export`: render an environment's secrets in a shell or container format.
//!
//! Supported formats: `env` (default), `shell`, `cmd`, `powershell`, `docker`.

use std::path::Path;

use crate::cli::commands::secret_copy::copy_to_clipboard;
use crate::cli::output;
use crate::cli::{resolve_environment, unlock_session, Cli};
use crate::errors::{LdcmError, Result};
use crate::inject::{generate_env_file, render, write_secret_file, ExportFormat};

/// Execute the `export` command.
pub fn execute(
    cli: &Cli,
    project: &str,
    env: &str,
    format: &str,
    output_path: Option<&Path>,
    copy: bool,
) -> Result<()> {
    let format: ExportFormat = format.parse()?;

    let (_settings, mut session) = unlock_session(cli)?;
    let (_project, environment) = resolve_environment(&session, project, env)?;
    let secrets = session.decrypt_all(environment.id)?;
    session.lock();

    match output_path {
        Some(dest) => {
            // Safety: never clobber the vault database itself.
            if dest
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("db"))
            {
                return Err(LdcmError::CommandFailed(
                    "refusing to export over a .db file".into(),
                ));
            }

            let written = if format == ExportFormat::Env {
                generate_env_file(&secrets, Some(dest))?
            } else {
                write_secret_file(dest, &render(&secrets, format))?;
                dest.to_path_buf()
            };

            output::success(&format!(
                "Exported {} secrets to {} (format: {format})",
                secrets.len(),
                written.display()
            ));
        }
        None if copy => {
            copy_to_clipboard(&render(&secrets, format))?;
            output::success(&format!(
                "Copied {} secrets to clipboard (format: {format})",
                secrets.len()
            ));
        }
        None => {
            // Raw output only, so it can be piped or eval'd.
            let content = render(&secrets, format);
            if !content.is_empty() {
                println!("{content}");
            }
        }
    }

    Ok(())
}
