use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pgmigrate_core::{Direction, MigrateError, MigrationUnit};
use pgmigrate_ledger::{LedgerStore, LedgerTransaction};
use pgmigrate_loader::{MigrationLoader, discover};

use crate::outcome::Outcome;

/// Applies and rolls back migrations so that the ledger matches what is on disk.
///
/// Migrations run strictly one after another. A unit and its ledger write
/// share one transaction unless the unit opts out, so a failure never leaves
/// effects behind without a matching ledger entry.
pub struct Reconciler<'a> {
    store: &'a dyn LedgerStore,
    loader: &'a dyn MigrationLoader,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn LedgerStore, loader: &'a dyn MigrationLoader) -> Self {
        Self { store, loader }
    }

    /// Apply every migration in `dir` that the ledger does not know yet.
    ///
    /// Stops at the first failure; files after it are left for the next run.
    pub async fn migrate_all<F>(
        &self,
        dir: &Path,
        mut on_outcome: F,
    ) -> Result<Vec<Outcome>, MigrateError>
    where
        F: FnMut(&Outcome),
    {
        self.store.ensure_schema().await?;
        let applied: HashSet<String> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .map(|r| r.file_name)
            .collect();

        let files = discover(dir)?;
        let mut outcomes = Vec::with_capacity(files.len());
        for file_name in files {
            let outcome = if applied.contains(&file_name) {
                Outcome::Skipped(file_name)
            } else {
                self.run(dir, &file_name, Direction::Up).await?;
                Outcome::Applied(file_name)
            };
            on_outcome(&outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Apply a single migration file unless the ledger already has it.
    pub async fn migrate_one<F>(
        &self,
        path: &Path,
        mut on_outcome: F,
    ) -> Result<Outcome, MigrateError>
    where
        F: FnMut(&Outcome),
    {
        let (dir, file_name) = split_path(path)?;
        self.store.ensure_schema().await?;

        let outcome = if self.store.find_by_name(&file_name).await?.is_some() {
            Outcome::Conflict(file_name)
        } else {
            self.run(&dir, &file_name, Direction::Up).await?;
            Outcome::Applied(file_name)
        };
        on_outcome(&outcome);
        Ok(outcome)
    }

    /// Run `down` for an applied migration and forget it in the ledger.
    /// On failure the ledger record stays, so the rollback can be retried.
    pub async fn rollback<F>(
        &self,
        path: &Path,
        mut on_outcome: F,
    ) -> Result<Outcome, MigrateError>
    where
        F: FnMut(&Outcome),
    {
        let (dir, file_name) = split_path(path)?;
        self.store.ensure_schema().await?;

        let outcome = if self.store.find_by_name(&file_name).await?.is_none() {
            Outcome::NotInLedger(file_name)
        } else {
            self.run(&dir, &file_name, Direction::Down).await?;
            Outcome::RolledBack(file_name)
        };
        on_outcome(&outcome);
        Ok(outcome)
    }

    async fn run(
        &self,
        dir: &Path,
        file_name: &str,
        direction: Direction,
    ) -> Result<(), MigrateError> {
        let unit = self.loader.load(dir, file_name)?;
        if unit.transactional() {
            self.run_in_transaction(unit.as_ref(), file_name, direction).await?;
        } else {
            self.run_direct(unit.as_ref(), file_name, direction).await?;
        }
        tracing::info!(migration = %file_name, %direction, "migration finished");
        Ok(())
    }

    async fn run_in_transaction(
        &self,
        unit: &dyn MigrationUnit,
        file_name: &str,
        direction: Direction,
    ) -> Result<(), MigrateError> {
        let mut tx = self.store.begin().await?;

        if let Err(source) = direction.run(unit, tx.executor()).await {
            abort(tx, file_name).await;
            return Err(MigrateError::execution(file_name, source));
        }

        let recorded = match direction {
            Direction::Up => tx.insert(file_name).await,
            Direction::Down => tx.delete(file_name).await,
        };
        if let Err(source) = recorded {
            abort(tx, file_name).await;
            return Err(MigrateError::write(file_name, source));
        }

        tx.commit()
            .await
            .map_err(|source| MigrateError::write(file_name, source))
    }

    async fn run_direct(
        &self,
        unit: &dyn MigrationUnit,
        file_name: &str,
        direction: Direction,
    ) -> Result<(), MigrateError> {
        tracing::debug!(migration = %file_name, "running outside a transaction");
        let mut conn = self.store.connect().await?;
        direction
            .run(unit, conn.as_mut())
            .await
            .map_err(|source| MigrateError::execution(file_name, source))?;
        drop(conn);

        let recorded = match direction {
            Direction::Up => self.store.insert(file_name).await,
            Direction::Down => self.store.delete(file_name).await,
        };
        recorded.map_err(|source| MigrateError::write(file_name, source))
    }
}

async fn abort(tx: Box<dyn LedgerTransaction>, file_name: &str) {
    if let Err(err) = tx.rollback().await {
        tracing::warn!(migration = %file_name, error = %err, "transaction rollback failed");
    }
}

/// Split a migration path into the directory to load from and the ledger name.
fn split_path(path: &Path) -> Result<(PathBuf, String), MigrateError> {
    if !path.is_file() {
        return Err(MigrateError::NotFound(format!(
            "migration file {}",
            path.display()
        )));
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MigrateError::NotFound(format!("migration file {}", path.display())))?
        .to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}
