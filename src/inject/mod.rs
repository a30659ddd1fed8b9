//! Injection: getting decrypted secrets out of the vault.
//!
//! - `format`: pure text renderers (dotenv, shell, cmd, PowerShell, docker)
//! - `process`: child processes, terminals and `.env` files

pub mod format;
pub mod process;

pub use format::{render, ExportFormat};
pub use process::{
    generate_env_file, open_interactive, run_with_secrets, write_secret_file, RunOutput,
};
