pub const PG_USER: &str = "PG_USER";
pub const PG_PASSWORD: &str = "PG_PASSWORD";
pub const PG_DBNAME: &str = "PG_DBNAME";
pub const PG_HOST: &str = "PG_HOST";
pub const PG_PORT: &str = "PG_PORT";

/// Database settings taken from the environment. Empty variables count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl EnvOverrides {
    /// Read the `PG_*` variables of the current process.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            user: get(PG_USER),
            password: get(PG_PASSWORD),
            database: get(PG_DBNAME),
            host: get(PG_HOST),
            port: get(PG_PORT),
        }
    }
}
