use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser};
use pgmigrate_config::{DEFAULT_CONFIG_PATH, ScriptFormat};
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;
use commands::{cmd_add, cmd_list, cmd_migrate, cmd_rollback};
use utils::print_error;

/// Environment variable holding the log filter, e.g. `PGMIGRATE_LOG=debug`.
const LOG_ENV: &str = "PGMIGRATE_LOG";

/// Keyword accepted by `--list` and `--migrate` meaning "the whole directory".
const ALL: &str = "all";

/// Apply and roll back PostgreSQL migrations kept as files in a directory.
#[derive(Parser, Debug)]
#[command(name = "pgmigrate", author, version, about)]
#[command(group(
    ArgGroup::new("action")
        .multiple(false)
        .args(["add_migration", "rollback_migration", "list", "migrate"])
))]
struct Cli {
    /// Configuration YAML file with a `db` section.
    #[arg(short = 'c', long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Migration directory.
    #[arg(short = 'd', long, value_name = "PATH", default_value = "migrations")]
    directory: PathBuf,

    /// Add a new migration file named `<timestamp>_<name>`.
    #[arg(short = 'a', long, value_name = "NAME")]
    add_migration: Option<String>,

    /// File format for `--add-migration`.
    #[arg(short = 'f', long, value_enum, default_value = "yaml")]
    format: ScriptFormat,

    /// Roll back the migration file at the given path.
    #[arg(short = 'r', long, value_name = "PATH")]
    rollback_migration: Option<PathBuf>,

    /// List applied (DONE) and pending (TODO) migrations, optionally for another directory.
    #[arg(short = 'l', long, value_name = "PATH", num_args = 0..=1, default_missing_value = ALL)]
    list: Option<String>,

    /// Apply every pending migration, or only the file at the given path.
    #[arg(short = 'm', long, value_name = "PATH", num_args = 0..=1, default_missing_value = ALL)]
    migrate: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Add(&'a str),
    Rollback(&'a Path),
    List(Option<&'a Path>),
    Migrate(Option<&'a Path>),
}

impl Cli {
    fn action(&self) -> Option<Action<'_>> {
        if let Some(name) = &self.add_migration {
            Some(Action::Add(name))
        } else if let Some(path) = &self.rollback_migration {
            Some(Action::Rollback(path))
        } else if let Some(target) = &self.migrate {
            Some(Action::Migrate(target_path(target)))
        } else {
            self.list.as_deref().map(|target| Action::List(target_path(target)))
        }
    }
}

/// `None` for the `all` keyword, otherwise the path given.
fn target_path(value: &str) -> Option<&Path> {
    (value != ALL).then(|| Path::new(value))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    match cli.action() {
        Some(Action::Add(name)) => cmd_add(&cli.directory, name, cli.format),
        Some(Action::Rollback(path)) => cmd_rollback(&cli.config, path).await,
        Some(Action::Migrate(target)) => cmd_migrate(&cli.config, &cli.directory, target).await,
        Some(Action::List(target)) => cmd_list(&cli.config, &cli.directory, target).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
