use thiserror::Error;

/// A failure reported by the database driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DatabaseError(pub String);

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("invalid migration name: {0:?}")]
    InvalidName(String),
    #[error("failed to update ledger for `{name}`: {source}")]
    Write {
        name: String,
        #[source]
        source: DatabaseError,
    },
    #[error("migration `{name}` failed: {source}")]
    Execution {
        name: String,
        #[source]
        source: DatabaseError,
    },
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MigrateError {
    pub fn write(name: &str, source: DatabaseError) -> Self {
        Self::Write {
            name: name.to_string(),
            source,
        }
    }

    pub fn execution(name: &str, source: DatabaseError) -> Self {
        Self::Execution {
            name: name.to_string(),
            source,
        }
    }
}
