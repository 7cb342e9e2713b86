use std::path::PathBuf;

use thiserror::Error;

const CONFIG_EXAMPLE: &str = "db:
  host: 127.0.0.1
  port: 5432
  user: postgres
  password: postgres
  database: app";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} not found, for example:\n{}", .0.display(), CONFIG_EXAMPLE)]
    Missing(PathBuf),
    #[error("read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("missing `db` section in config")]
    MissingDbSection,
    #[error("missing database setting `{0}` in config file or environment")]
    MissingField(&'static str),
    #[error("invalid port {0:?}")]
    InvalidPort(String),
}
