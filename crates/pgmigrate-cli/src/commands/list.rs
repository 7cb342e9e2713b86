use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use pgmigrate_ledger::PgLedger;
use pgmigrate_runner::status;

use crate::utils::{ensure_directory, load_migrator_config};

/// Print `DONE` lines for applied migrations, then `TODO` lines for pending ones.
pub async fn cmd_list(config_path: &Path, directory: &Path, target: Option<&Path>) -> Result<()> {
    let config = load_migrator_config(config_path)?;
    let directory = target.unwrap_or(directory);
    ensure_directory(directory)?;

    let ledger = PgLedger::new(&config);
    let status = status(&ledger, directory)
        .await
        .context("list migrations")?;

    for name in &status.done {
        println!("{} {}", "DONE".bright_green(), name);
    }
    for name in &status.todo {
        println!("{} {}", "TODO".bright_yellow(), name);
    }
    Ok(())
}
