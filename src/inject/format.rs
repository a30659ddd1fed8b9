//! Export formats for decrypted secrets.
//!
//! Lines are joined with `\n` without a trailing newline, in the map's
//! insertion order. Values are written verbatim: nothing is quoted or
//! escaped, so a value containing spaces, quotes or newlines produces
//! output the target tool may misread.

use std::fmt;
use std::str::FromStr;

use crate::errors::LdcmError;
use crate::vault::SecretMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `KEY=VALUE`
    Env,
    /// `export KEY=VALUE`
    Shell,
    /// `set KEY=VALUE` (Windows cmd)
    Cmd,
    /// `$env:KEY="VALUE"`
    PowerShell,
    /// `      - KEY=VALUE` (docker-compose `environment:` list item)
    Docker,
}

impl ExportFormat {
    pub const NAMES: [&'static str; 5] = ["env", "shell", "cmd", "powershell", "docker"];

    pub fn name(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Shell => "shell",
            Self::Cmd => "cmd",
            Self::PowerShell => "powershell",
            Self::Docker => "docker",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = LdcmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "env" => Ok(Self::Env),
            "shell" => Ok(Self::Shell),
            "cmd" => Ok(Self::Cmd),
            "powershell" => Ok(Self::PowerShell),
            "docker" => Ok(Self::Docker),
            other => Err(LdcmError::CommandFailed(format!(
                "unknown export format '{other}', use one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Render `secrets` in the given format.
pub fn render(secrets: &SecretMap, format: ExportFormat) -> String {
    match format {
        ExportFormat::Env => to_dotenv(secrets),
        ExportFormat::Shell => to_shell_export(secrets),
        ExportFormat::Cmd => to_cmd(secrets),
        ExportFormat::PowerShell => to_powershell(secrets),
        ExportFormat::Docker => to_docker(secrets),
    }
}

fn lines<F>(secrets: &SecretMap, line: F) -> String
where
    F: Fn(&str, &str) -> String,
{
    secrets
        .iter()
        .map(|(k, v)| line(k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_dotenv(secrets: &SecretMap) -> String {
    lines(secrets, |k, v| format!("{k}={v}"))
}

pub fn to_shell_export(secrets: &SecretMap) -> String {
    lines(secrets, |k, v| format!("export {k}={v}"))
}

pub fn to_cmd(secrets: &SecretMap) -> String {
    lines(secrets, |k, v| format!("set {k}={v}"))
}

pub fn to_powershell(secrets: &SecretMap) -> String {
    lines(secrets, |k, v| format!("$env:{k}=\"{v}\""))
}

pub fn to_docker(secrets: &SecretMap) -> String {
    lines(secrets, |k, v| format!("      - {k}={v}"))
}
