//! Running programs and terminals with secrets in their environment.
//!
//! Secret values only ever travel through the child's environment table.
//! They are never spliced into a command line, which other local users
//! could read from the process list.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::format::to_dotenv;
use crate::errors::{LdcmError, Result};
use crate::vault::SecretMap;

/// Terminal emulator used when none is configured.
#[cfg(not(windows))]
const DEFAULT_TERMINAL: &str = "gnome-terminal";

/// Captured result of `run_with_secrets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` if the child was killed by a signal.
    pub exit_code: Option<i32>,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Build `sh -c <command>` (or `cmd /C <command>` on Windows).
fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Run `command` in a subshell with `secrets` added to the inherited
/// environment and wait for it to finish.
///
/// A non-zero exit is not an error: the caller gets the captured output
/// and exit code either way.
pub fn run_with_secrets(
    secrets: &SecretMap,
    command: &str,
    working_dir: Option<&Path>,
) -> Result<RunOutput> {
    let mut cmd = shell_command(command);
    cmd.envs(secrets.iter());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    debug!(
        secrets = secrets.len(),
        working_dir = ?working_dir,
        "running command with injected secrets"
    );
    let output = cmd
        .output()
        .map_err(|e| LdcmError::ProcessSpawnError(e.to_string()))?;

    Ok(RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
    })
}

/// Build the command that opens a new terminal window in `cwd`, optionally
/// running `command` inside it.
fn terminal_command(terminal: Option<&str>, command: Option<&str>, cwd: &Path) -> Command {
    #[cfg(windows)]
    {
        let _ = terminal;
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", "cmd", "/K"]);
        if let Some(command) = command {
            cmd.arg(command);
        }
        cmd.current_dir(cwd);
        cmd
    }
    #[cfg(not(windows))]
    {
        let program = terminal.unwrap_or(DEFAULT_TERMINAL);
        let mut cmd = Command::new(program);
        let gnome_style = Path::new(program)
            .file_name()
            .is_some_and(|name| name == DEFAULT_TERMINAL);

        if gnome_style {
            cmd.arg(format!("--working-directory={}", cwd.display()));
        }
        if let Some(command) = command {
            cmd.arg(if gnome_style { "--" } else { "-e" });
            cmd.args(["sh", "-c", command]);
        }
        cmd.current_dir(cwd);
        cmd
    }
}

/// Open a terminal (or run `command` in one) with `secrets` in its
/// environment and return without waiting for it.
pub fn open_interactive(
    secrets: &SecretMap,
    command: Option<&str>,
    working_dir: Option<&Path>,
    terminal: Option<&str>,
) -> Result<()> {
    let cwd = match working_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let mut cmd = terminal_command(terminal, command, &cwd);
    cmd.envs(secrets.iter())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    debug!(
        program = ?cmd.get_program(),
        working_dir = %cwd.display(),
        "opening terminal with injected secrets"
    );
    cmd.spawn()
        .map_err(|e| LdcmError::ProcessSpawnError(format!("{:?}: {e}", cmd.get_program())))?;
    Ok(())
}

/// Write `secrets` in dotenv format to `path` (default: `./.env`),
/// replacing any existing file. Returns the path written.
pub fn generate_env_file(secrets: &SecretMap, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?.join(".env"),
    };

    write_secret_file(&path, &to_dotenv(secrets))?;
    Ok(path)
}

/// Write decrypted content to `path`, truncating any existing file.
///
/// On Unix the file is created owner-only (`0o600`), and a pre-existing
/// file is narrowed to `0o600` before anything is written to it.
pub fn write_secret_file(path: &Path, content: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}
