pub mod error;
pub mod name;
pub mod record;
pub mod unit;

pub use error::{DatabaseError, MigrateError};
pub use name::{
    MAX_FILE_NAME_LEN, RESERVED_PREFIXES, is_reserved, migration_file_name, slugify,
    split_timestamp,
};
pub use record::MigrationRecord;
pub use unit::{Direction, Executor, MigrationUnit};
