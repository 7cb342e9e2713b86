use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use pgmigrate_config::{MigratorConfig, load_config};
use pgmigrate_runner::Outcome;

/// Load the database config, failing with an example config when the file is missing.
pub fn load_migrator_config(path: &Path) -> Result<MigratorConfig> {
    let config = load_config(path)?;
    tracing::debug!(
        config = %path.display(),
        db = ?config.db,
        ledger_table = config.ledger_table(),
        "configuration loaded"
    );
    Ok(config)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("directory --directory {} does not exist", dir.display());
    }
    Ok(())
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "--ERROR--".bright_red().bold(), msg);
}

/// Progress line for one migration file.
pub fn print_outcome(outcome: &Outcome) {
    let line = outcome.to_string();
    match outcome {
        Outcome::Applied(_) | Outcome::RolledBack(_) => println!("{}", line.bright_green()),
        Outcome::Skipped(_) => println!("{}", line.dimmed()),
        Outcome::Conflict(_) | Outcome::NotInLedger(_) => print_error(&line),
    }
}
