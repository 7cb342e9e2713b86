use std::collections::HashSet;
use std::path::Path;

use pgmigrate_core::MigrateError;
use pgmigrate_ledger::LedgerStore;
use pgmigrate_loader::discover;

/// Migration files split by whether the ledger has them, each in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub done: Vec<String>,
    pub todo: Vec<String>,
}

impl Status {
    pub fn is_up_to_date(&self) -> bool {
        self.todo.is_empty()
    }
}

pub async fn status(store: &dyn LedgerStore, dir: &Path) -> Result<Status, MigrateError> {
    store.ensure_schema().await?;
    let applied: HashSet<String> = store
        .list_all()
        .await?
        .into_iter()
        .map(|r| r.file_name)
        .collect();

    let (done, todo): (Vec<String>, Vec<String>) = discover(dir)?
        .into_iter()
        .partition(|name| applied.contains(name));
    Ok(Status { done, todo })
}
