use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::env::EnvOverrides;
use crate::error::ConfigError;

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "conf/db.yaml";

/// Default name of the ledger table.
pub const DEFAULT_LEDGER_TABLE: &str = "migration";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";
const DEFAULT_PASSWORD: &str = "postgres";

/// Connection settings for the target database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Everything the tool needs from the config file, after environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorConfig {
    pub db: DatabaseConfig,
    pub ledger_table: String,
}

impl MigratorConfig {
    /// Read `path` and apply `env` on top of it.
    pub fn load(path: &Path, env: &EnvOverrides) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        file.resolve(env)
    }

    pub fn ledger_table(&self) -> &str {
        &self.ledger_table
    }
}

/// Load the config file with overrides from the process environment.
pub fn load_config(path: &Path) -> Result<MigratorConfig, ConfigError> {
    MigratorConfig::load(path, &EnvOverrides::from_env())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    db: Option<DbSection>,
    #[serde(default)]
    ledger: LedgerSection,
}

#[derive(Debug, Default, Deserialize)]
struct DbSection {
    host: Option<Scalar>,
    port: Option<Scalar>,
    user: Option<Scalar>,
    password: Option<Scalar>,
    database: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct LedgerSection {
    #[serde(default = "default_ledger_table")]
    table: String,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            table: default_ledger_table(),
        }
    }
}

fn default_ledger_table() -> String {
    DEFAULT_LEDGER_TABLE.to_string()
}

/// YAML happily types `password: 1234` as a number; accept any scalar.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_yaml::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

impl ConfigFile {
    fn resolve(self, env: &EnvOverrides) -> Result<MigratorConfig, ConfigError> {
        let db = self.db.ok_or(ConfigError::MissingDbSection)?;

        let pick = |env_value: &Option<String>, file_value: Option<Scalar>| {
            env_value
                .clone()
                .or_else(|| file_value.map(Scalar::into_string))
        };

        let port = match pick(&env.port, db.port) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let database =
            pick(&env.database, db.database).ok_or(ConfigError::MissingField("database"))?;

        Ok(MigratorConfig {
            db: DatabaseConfig {
                host: pick(&env.host, db.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
                user: pick(&env.user, db.user).unwrap_or_else(|| DEFAULT_USER.to_string()),
                password: pick(&env.password, db.password)
                    .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
                database,
            },
            ledger_table: self.ledger.table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("db.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    const FULL: &str = "db:
  host: db.internal
  port: 6432
  user: app
  password: secret
  database: shop
";

    #[test]
    fn reads_all_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, FULL);

        let cfg = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap();

        assert_eq!(cfg.db.host, "db.internal");
        assert_eq!(cfg.db.port, 6432);
        assert_eq!(cfg.db.user, "app");
        assert_eq!(cfg.db.password, "secret");
        assert_eq!(cfg.db.database, "shop");
        assert_eq!(cfg.ledger_table(), DEFAULT_LEDGER_TABLE);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "db:\n  database: shop\n");

        let cfg = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap();

        assert_eq!(cfg.db.host, "127.0.0.1");
        assert_eq!(cfg.db.port, 5432);
        assert_eq!(cfg.db.user, "postgres");
        assert_eq!(cfg.db.password, "postgres");
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, FULL);
        let env = EnvOverrides {
            user: Some("ci".into()),
            password: Some("ci-pass".into()),
            database: Some("shop_test".into()),
            host: Some("localhost".into()),
            port: Some("5433".into()),
        };

        let cfg = MigratorConfig::load(&path, &env).unwrap();

        assert_eq!(cfg.db.user, "ci");
        assert_eq!(cfg.db.password, "ci-pass");
        assert_eq!(cfg.db.database, "shop_test");
        assert_eq!(cfg.db.host, "localhost");
        assert_eq!(cfg.db.port, 5433);
    }

    #[test]
    fn database_may_come_from_environment_only() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "db:\n  host: localhost\n");
        let env = EnvOverrides {
            database: Some("from_env".into()),
            ..Default::default()
        };

        let cfg = MigratorConfig::load(&path, &env).unwrap();
        assert_eq!(cfg.db.database, "from_env");
    }

    #[rstest]
    #[case("db:\n  host: localhost\n", "database")]
    fn missing_database_is_an_error(#[case] content: &str, #[case] field: &str) {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, content);

        let err = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == field));
    }

    #[test]
    fn missing_db_section_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "other:\n  key: value\n");

        let err = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDbSection));
    }

    #[test]
    fn missing_file_mentions_example() {
        let dir = TempDir::new().unwrap();
        let err =
            MigratorConfig::load(&dir.path().join("nope.yaml"), &EnvOverrides::default())
                .unwrap_err();

        assert!(matches!(err, ConfigError::Missing(_)));
        assert!(err.to_string().contains("database:"));
    }

    #[rstest]
    #[case("db:\n  database: shop\n  port: '5432'\n", 5432)]
    #[case("db:\n  database: shop\n  port: 15432\n", 15432)]
    fn port_accepts_numbers_and_strings(#[case] content: &str, #[case] expected: u16) {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, content);

        let cfg = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.db.port, expected);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "db:\n  database: shop\n  port: http\n");

        let err = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "http"));
    }

    #[test]
    fn numeric_password_is_kept_as_text() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "db:\n  database: shop\n  password: 1234\n");

        let cfg = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.db.password, "1234");
    }

    #[test]
    fn ledger_table_can_be_renamed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "db:\n  database: shop\nledger:\n  table: schema_history\n");

        let cfg = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.ledger_table(), "schema_history");
    }

    #[test]
    fn debug_output_hides_password() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, FULL);

        let cfg = MigratorConfig::load(&path, &EnvOverrides::default()).unwrap();
        let debug = format!("{:?}", cfg.db);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
