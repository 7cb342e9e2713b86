use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use pgmigrate_config::ScriptFormat;
use pgmigrate_core::{MigrateError, MigrationUnit};

use crate::script::{MigrationScript, ScriptUnit};

/// Resolves a migration file name to a unit. Loading never runs the unit.
pub trait MigrationLoader: Send + Sync {
    fn load(&self, dir: &Path, file_name: &str) -> Result<Arc<dyn MigrationUnit>, MigrateError>;
}

/// Loads YAML/JSON migration scripts from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_script(
        &self,
        dir: &Path,
        file_name: &str,
    ) -> Result<MigrationScript, MigrateError> {
        let path = dir.join(file_name);
        if !path.is_file() {
            return Err(MigrateError::NotFound(format!(
                "migration file {}",
                path.display()
            )));
        }
        let format = ScriptFormat::from_file_name(file_name).ok_or_else(|| {
            MigrateError::NotFound(format!(
                "{} is not a migration script (expected .yaml, .yml or .json)",
                path.display()
            ))
        })?;
        let text = fs::read_to_string(&path)?;
        MigrationScript::parse(&text, format).map_err(|e| {
            MigrateError::NotFound(format!(
                "{} cannot be resolved as a migration: {e}",
                path.display()
            ))
        })
    }
}

impl MigrationLoader for FileLoader {
    fn load(&self, dir: &Path, file_name: &str) -> Result<Arc<dyn MigrationUnit>, MigrateError> {
        let script = self.load_script(dir, file_name)?;
        tracing::debug!(file = %file_name, "loaded migration script");
        Ok(Arc::new(ScriptUnit::new(script)))
    }
}

/// Compiled-in table of migrations keyed by file name, for programs that
/// define their units in Rust. The directory is ignored.
#[derive(Default, Clone)]
pub struct StaticRegistry {
    units: HashMap<String, Arc<dyn MigrationUnit>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        file_name: impl Into<String>,
        unit: impl MigrationUnit + 'static,
    ) -> Self {
        self.units.insert(file_name.into(), Arc::new(unit));
        self
    }

    pub fn insert(&mut self, file_name: impl Into<String>, unit: Arc<dyn MigrationUnit>) {
        self.units.insert(file_name.into(), unit);
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl MigrationLoader for StaticRegistry {
    fn load(&self, _dir: &Path, file_name: &str) -> Result<Arc<dyn MigrationUnit>, MigrateError> {
        self.units
            .get(file_name)
            .cloned()
            .ok_or_else(|| MigrateError::NotFound(format!("no registered migration {file_name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pgmigrate_core::{DatabaseError, Executor};
    use tempfile::TempDir;

    struct Noop;

    #[async_trait]
    impl MigrationUnit for Noop {
        async fn up(&self, _db: &mut dyn Executor) -> Result<(), DatabaseError> {
            Ok(())
        }

        async fn down(&self, _db: &mut dyn Executor) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[test]
    fn file_loader_reads_yaml_script() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("1_users.yaml"),
            "transaction: false\nup: CREATE TABLE users ()\ndown: DROP TABLE users\n",
        )
        .unwrap();

        let unit = FileLoader::new().load(tmp.path(), "1_users.yaml").unwrap();
        assert!(!unit.transactional());
    }

    #[test]
    fn file_loader_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = FileLoader::new().load(tmp.path(), "1_missing.yaml").err().unwrap();
        assert!(matches!(err, MigrateError::NotFound(_)));
    }

    #[test]
    fn file_loader_unparsable_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("1_bad.json"), "{ not json").unwrap();

        let err = FileLoader::new().load(tmp.path(), "1_bad.json").err().unwrap();
        assert!(matches!(err, MigrateError::NotFound(msg) if msg.contains("cannot be resolved")));
    }

    #[test]
    fn file_loader_rejects_unknown_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("1_old.py"), "async def up(config): pass").unwrap();

        let err = FileLoader::new().load(tmp.path(), "1_old.py").err().unwrap();
        assert!(matches!(err, MigrateError::NotFound(_)));
    }

    #[test]
    fn registry_resolves_by_name() {
        let registry = StaticRegistry::new().register("1_a.yaml", Noop);

        assert_eq!(registry.len(), 1);
        assert!(registry.load(Path::new("anywhere"), "1_a.yaml").is_ok());
        let err = registry.load(Path::new("anywhere"), "2_b.yaml").err().unwrap();
        assert!(matches!(err, MigrateError::NotFound(_)));
    }
}
