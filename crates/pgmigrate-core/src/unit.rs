use async_trait::async_trait;

use crate::error::DatabaseError;

/// Runs SQL against one open database connection.
#[async_trait]
pub trait Executor: Send {
    /// Execute one or more statements, returning the affected row count.
    async fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError>;
}

/// A migration exposing a forward and a reverse operation.
///
/// Units only describe effects; the reconciler decides when to run them and
/// which connection they run on.
#[async_trait]
pub trait MigrationUnit: Send + Sync {
    async fn up(&self, db: &mut dyn Executor) -> Result<(), DatabaseError>;

    async fn down(&self, db: &mut dyn Executor) -> Result<(), DatabaseError>;

    /// Whether the unit may run inside a transaction together with its ledger
    /// write. Statements such as `CREATE INDEX CONCURRENTLY` cannot.
    fn transactional(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub async fn run(
        self,
        unit: &dyn MigrationUnit,
        db: &mut dyn Executor,
    ) -> Result<(), DatabaseError> {
        match self {
            Direction::Up => unit.up(db).await,
            Direction::Down => unit.down(db).await,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}
