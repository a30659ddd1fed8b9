use clap::Parser;
use ldcm::cli::{commands, data_dir, output, Cli, Commands};
use ldcm::config::Settings;
use ldcm::errors::LdcmError;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Projects => commands::projects::execute(&cli),
        Commands::ProjectAdd { ref name } => commands::project_add::execute(&cli, name),
        Commands::ProjectDelete { id, force } => commands::project_delete::execute(&cli, id, force),
        Commands::Secrets {
            ref project,
            ref env,
            reveal,
        } => commands::secrets::execute(&cli, project, env, reveal),
        Commands::SecretAdd {
            ref project,
            ref env,
            ref key,
            ref value,
            expires_at,
        } => commands::secret_add::execute(&cli, project, env, key, value.as_deref(), expires_at),
        Commands::SecretUpdate {
            id,
            ref key,
            ref value,
        } => commands::secret_update::execute(&cli, id, key.as_deref(), value.as_deref()),
        Commands::SecretDelete { id } => commands::secret_delete::execute(&cli, id),
        Commands::SecretCopy {
            ref project,
            ref env,
            ref key,
        } => commands::secret_copy::execute(&cli, project, env, key),
        Commands::Inject {
            ref project,
            ref env,
            ref command,
            ref dir,
        } => commands::inject::execute(&cli, project, env, command.as_deref(), dir.as_deref()),
        Commands::Export {
            ref project,
            ref env,
            ref format,
            ref output,
            copy,
        } => commands::export::execute(&cli, project, env, format, output.as_deref(), copy),
    };

    match result {
        Ok(()) => {}
        // The child already reported its own failure on stderr.
        Err(LdcmError::ChildProcessFailed(code)) => std::process::exit(code),
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so `export` output on stdout stays clean.
///
/// `RUST_LOG` wins; otherwise `--verbose` means debug and the config file's
/// `log_level` applies.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        Settings::load(&data_dir(cli))
            .map(|s| s.log_level)
            .unwrap_or_else(|_| Settings::default().log_level)
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ldcm={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
