use async_trait::async_trait;
use pgmigrate_core::{DatabaseError, Executor, MigrationRecord};

/// Durable record of which migrations have been applied.
///
/// Implementations open a fresh connection per call; nothing is cached, so
/// every call sees the current state of the ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create the ledger table when it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), DatabaseError>;

    /// All records. Callers must not depend on the row order.
    async fn list_all(&self) -> Result<Vec<MigrationRecord>, DatabaseError>;

    async fn find_by_name(&self, file_name: &str)
    -> Result<Option<MigrationRecord>, DatabaseError>;

    /// Record `file_name` as applied now.
    async fn insert(&self, file_name: &str) -> Result<(), DatabaseError>;

    async fn delete(&self, file_name: &str) -> Result<(), DatabaseError>;

    /// A plain connection for units that cannot run inside a transaction.
    async fn connect(&self) -> Result<Box<dyn Executor>, DatabaseError>;

    /// A connection with an open transaction. Dropping it without
    /// [`LedgerTransaction::commit`] discards everything done through it.
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, DatabaseError>;
}

/// Unit statements and ledger writes sharing one transaction.
#[async_trait]
pub trait LedgerTransaction: Send {
    fn executor(&mut self) -> &mut dyn Executor;

    async fn insert(&mut self, file_name: &str) -> Result<(), DatabaseError>;

    async fn delete(&mut self, file_name: &str) -> Result<(), DatabaseError>;

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError>;
}
