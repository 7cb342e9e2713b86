use std::path::Path;

use anyhow::{Context, Result, bail};
use pgmigrate_ledger::PgLedger;
use pgmigrate_loader::FileLoader;
use pgmigrate_runner::{Outcome, Reconciler};

use crate::utils::{ensure_directory, load_migrator_config, print_outcome};

/// Apply every pending migration in `directory`, or only `target` when given.
pub async fn cmd_migrate(
    config_path: &Path,
    directory: &Path,
    target: Option<&Path>,
) -> Result<()> {
    let config = load_migrator_config(config_path)?;
    let ledger = PgLedger::new(&config);
    let loader = FileLoader::new();
    let reconciler = Reconciler::new(&ledger, &loader);

    let Some(path) = target else {
        ensure_directory(directory)?;
        reconciler
            .migrate_all(directory, print_outcome)
            .await
            .context("migrate")?;
        return Ok(());
    };

    let outcome = reconciler
        .migrate_one(path, |_| {})
        .await
        .with_context(|| format!("migrate file `{}`", path.display()))?;
    if let Outcome::Conflict(_) = outcome {
        bail!("Migration `{}` found in migration table", path.display());
    }
    println!("Migrated file `{}`", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_config_is_reported_with_example() {
        let tmp = tempdir().unwrap();

        let err = cmd_migrate(&tmp.path().join("db.yaml"), tmp.path(), None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("for example"));
    }

    #[tokio::test]
    async fn missing_file_needs_no_database() {
        let tmp = tempdir().unwrap();
        let config = tmp.path().join("db.yaml");
        fs::write(&config, "db:\n  database: app\n").unwrap();
        let path = tmp.path().join("1_missing.yaml");

        let err = cmd_migrate(&config, tmp.path(), Some(&path))
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("not found"), "{err:#}");
    }
}
