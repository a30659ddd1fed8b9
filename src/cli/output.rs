//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::store::{Environment, Project};

/// Placeholder shown instead of a secret value.
pub const MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print projects with their environment names (ID, Name, Environments, Created).
pub fn print_projects_table(projects: &[(Project, Vec<Environment>)]) {
    if projects.is_empty() {
        info("No projects found.");
        tip("Create one with `ldcm project-add <name>`.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Environments", "Created"]);

    for (project, envs) in projects {
        let names: Vec<&str> = envs.iter().map(|e| e.name.as_str()).collect();
        table.add_row(vec![
            project.id.to_string(),
            project.name.clone(),
            names.join(", "),
            project.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// One row of the secrets table. `value` is either plaintext or `MASK`.
pub struct SecretRow {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub expires: Option<String>,
}

/// Print a table of secrets (ID, Key, Value, Expires).
pub fn print_secrets_table(rows: &[SecretRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Key", "Value", "Expires"]);

    for row in rows {
        table.add_row(vec![
            row.id.to_string(),
            row.key.clone(),
            row.value.clone(),
            row.expires.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("{table}");
}
