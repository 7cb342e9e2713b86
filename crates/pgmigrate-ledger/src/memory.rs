use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use pgmigrate_core::{DatabaseError, Executor, MigrationRecord};

use crate::store::{LedgerStore, LedgerTransaction};

#[derive(Debug, Clone, Default)]
struct State {
    schema_ready: bool,
    last_id: i32,
    records: Vec<MigrationRecord>,
    statements: Vec<String>,
    writes: usize,
    reject_writes: bool,
}

impl State {
    fn require_schema(&self) -> Result<(), DatabaseError> {
        if self.schema_ready {
            Ok(())
        } else {
            Err(DatabaseError::new("relation \"migration\" does not exist"))
        }
    }

    fn contains(&self, file_name: &str) -> bool {
        self.records.iter().any(|r| r.file_name == file_name)
    }

    fn check_write(&self) -> Result<(), DatabaseError> {
        self.require_schema()?;
        if self.reject_writes {
            return Err(DatabaseError::new("ledger is read-only"));
        }
        Ok(())
    }

    fn insert(&mut self, file_name: &str) -> Result<(), DatabaseError> {
        self.check_write()?;
        if self.contains(file_name) {
            return Err(duplicate(file_name));
        }
        self.last_id += 1;
        self.records.push(MigrationRecord {
            id: self.last_id,
            file_name: file_name.to_string(),
            applied_at: Utc::now().naive_utc(),
        });
        self.writes += 1;
        Ok(())
    }

    fn delete(&mut self, file_name: &str) -> Result<(), DatabaseError> {
        self.check_write()?;
        self.records.retain(|r| r.file_name != file_name);
        self.writes += 1;
        Ok(())
    }
}

fn duplicate(file_name: &str) -> DatabaseError {
    DatabaseError::new(format!(
        "duplicate key value violates unique constraint: file_name={file_name}"
    ))
}

/// In-process ledger with the same contract as [`crate::PgLedger`].
///
/// Clones share state. Statements executed by units are recorded so callers
/// can see what a migration would have run; statements issued inside a
/// transaction only become visible on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<State>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MigrationRecord> {
        self.state.lock().records.clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.state
            .lock()
            .records
            .iter()
            .map(|r| r.file_name.clone())
            .collect()
    }

    /// Statements run by units, in execution order.
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    /// Number of committed ledger inserts and deletes.
    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }

    /// Make every subsequent insert or delete fail.
    pub fn reject_writes(&self, reject: bool) {
        self.state.lock().reject_writes = reject;
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        self.state.lock().schema_ready = true;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<MigrationRecord>, DatabaseError> {
        let state = self.state.lock();
        state.require_schema()?;
        Ok(state.records.clone())
    }

    async fn find_by_name(
        &self,
        file_name: &str,
    ) -> Result<Option<MigrationRecord>, DatabaseError> {
        let state = self.state.lock();
        state.require_schema()?;
        Ok(state
            .records
            .iter()
            .find(|r| r.file_name == file_name)
            .cloned())
    }

    async fn insert(&self, file_name: &str) -> Result<(), DatabaseError> {
        self.state.lock().insert(file_name)
    }

    async fn delete(&self, file_name: &str) -> Result<(), DatabaseError> {
        self.state.lock().delete(file_name)
    }

    async fn connect(&self) -> Result<Box<dyn Executor>, DatabaseError> {
        Ok(Box::new(MemorySession {
            state: Arc::clone(&self.state),
        }))
    }

    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, DatabaseError> {
        Ok(Box::new(MemoryTransaction {
            state: Arc::clone(&self.state),
            statements: Vec::new(),
            ops: Vec::new(),
        }))
    }
}

struct MemorySession {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl Executor for MemorySession {
    async fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.state.lock().statements.push(sql.to_string());
        Ok(0)
    }
}

enum Op {
    Insert(String),
    Delete(String),
}

struct MemoryTransaction {
    state: Arc<Mutex<State>>,
    statements: Vec<String>,
    ops: Vec<Op>,
}

impl MemoryTransaction {
    /// Whether `file_name` is in the ledger as seen from inside this transaction.
    fn visible(&self, state: &State, file_name: &str) -> bool {
        self.ops
            .iter()
            .fold(state.contains(file_name), |present, op| match op {
                Op::Insert(name) if name == file_name => true,
                Op::Delete(name) if name == file_name => false,
                _ => present,
            })
    }
}

#[async_trait]
impl Executor for MemoryTransaction {
    async fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.statements.push(sql.to_string());
        Ok(0)
    }
}

#[async_trait]
impl LedgerTransaction for MemoryTransaction {
    fn executor(&mut self) -> &mut dyn Executor {
        self
    }

    async fn insert(&mut self, file_name: &str) -> Result<(), DatabaseError> {
        let state = Arc::clone(&self.state);
        let state = state.lock();
        state.check_write()?;
        if self.visible(&state, file_name) {
            return Err(duplicate(file_name));
        }
        self.ops.push(Op::Insert(file_name.to_string()));
        Ok(())
    }

    async fn delete(&mut self, file_name: &str) -> Result<(), DatabaseError> {
        self.state.lock().check_write()?;
        self.ops.push(Op::Delete(file_name.to_string()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let MemoryTransaction {
            state,
            statements,
            ops,
        } = *self;
        let mut state = state.lock();
        // all or nothing: replay on a copy, publish only if every op succeeds
        let mut next = state.clone();
        for op in ops {
            match op {
                Op::Insert(name) => next.insert(&name)?,
                Op::Delete(name) => next.delete(&name)?,
            }
        }
        next.statements.extend(statements);
        *state = next;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }
}
