use std::path::Path;

use anyhow::{Context, Result, bail};
use pgmigrate_ledger::PgLedger;
use pgmigrate_loader::FileLoader;
use pgmigrate_runner::{Outcome, Reconciler};

use crate::utils::{load_migrator_config, print_outcome};

pub async fn cmd_rollback(config_path: &Path, path: &Path) -> Result<()> {
    let config = load_migrator_config(config_path)?;
    let ledger = PgLedger::new(&config);
    let loader = FileLoader::new();

    let outcome = Reconciler::new(&ledger, &loader)
        .rollback(path, |_| {})
        .await
        .with_context(|| format!("rollback file `{}`", path.display()))?;
    if let Outcome::NotInLedger(_) = outcome {
        bail!("Migration `{}` not found in migration table", path.display());
    }
    print_outcome(&outcome);
    Ok(())
}
