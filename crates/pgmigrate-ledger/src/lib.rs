pub mod memory;
pub mod postgres;
pub mod sql;
pub mod store;

pub use memory::MemoryLedger;
pub use postgres::{PgLedger, connection_url};
pub use store::{LedgerStore, LedgerTransaction};
