use std::fmt;

/// What happened to one migration file during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `up` ran and the ledger now records the file.
    Applied(String),
    /// Already in the ledger; nothing was run.
    Skipped(String),
    /// Apply-one target is already in the ledger; nothing was run.
    Conflict(String),
    /// `down` ran and the ledger record was removed.
    RolledBack(String),
    /// Rollback target has no ledger record; nothing was run.
    NotInLedger(String),
}

impl Outcome {
    pub fn file_name(&self) -> &str {
        match self {
            Outcome::Applied(name)
            | Outcome::Skipped(name)
            | Outcome::Conflict(name)
            | Outcome::RolledBack(name)
            | Outcome::NotInLedger(name) => name,
        }
    }

    /// A no-op the user asked for but that could not be honoured.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Outcome::Conflict(_) | Outcome::NotInLedger(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied(name) => write!(f, "Applying {name}"),
            Outcome::Skipped(name) => write!(f, "Skipping {name}"),
            Outcome::Conflict(name) => write!(f, "Migration `{name}` found in migration table"),
            Outcome::RolledBack(name) => write!(f, "Rollback migration `{name}`"),
            Outcome::NotInLedger(name) => {
                write!(f, "Migration `{name}` not found in migration table")
            }
        }
    }
}
