pub mod config;
pub mod env;
pub mod error;
pub mod format;

pub use config::{
    DEFAULT_CONFIG_PATH, DEFAULT_LEDGER_TABLE, DatabaseConfig, MigratorConfig, load_config,
};
pub use env::{EnvOverrides, PG_DBNAME, PG_HOST, PG_PASSWORD, PG_PORT, PG_USER};
pub use error::ConfigError;
pub use format::ScriptFormat;
