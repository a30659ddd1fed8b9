//! One module per subcommand. Each exposes an `execute` function.

pub mod export;
pub mod init;
pub mod inject;
pub mod project_add;
pub mod project_delete;
pub mod projects;
pub mod secret_add;
pub mod secret_copy;
pub mod secret_delete;
pub mod secret_update;
pub mod secrets;
