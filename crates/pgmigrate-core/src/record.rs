use chrono::NaiveDateTime;

/// One row of the ledger table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub id: i32,
    pub file_name: String,
    pub applied_at: NaiveDateTime,
}
