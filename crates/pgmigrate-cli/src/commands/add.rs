use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use pgmigrate_config::ScriptFormat;
use pgmigrate_runner::add_migration;

use crate::utils::ensure_directory;

pub fn cmd_add(directory: &Path, name: &str, format: ScriptFormat) -> Result<()> {
    ensure_directory(directory)?;
    let path = add_migration(directory, name, format)
        .with_context(|| format!("add migration `{name}`"))?;

    println!(
        "{} {}",
        "Created migration:".bright_green().bold(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::{env, fs, path::PathBuf};
    use tempfile::tempdir;

    struct CwdGuard {
        original: PathBuf,
    }

    impl CwdGuard {
        fn new(dir: &Path) -> Self {
            let original = env::current_dir().unwrap();
            env::set_current_dir(dir).unwrap();
            Self { original }
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = env::set_current_dir(&self.original);
        }
    }

    #[test]
    #[serial]
    fn writes_file_into_relative_directory() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        fs::create_dir("migrations").unwrap();

        cmd_add(Path::new("migrations"), "create users", ScriptFormat::Yml).unwrap();

        let names: Vec<String> = fs::read_dir("migrations")
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("_create_users.yml"), "{names:?}");
    }

    #[test]
    #[serial]
    fn missing_directory_is_reported() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        let err = cmd_add(Path::new("migrations"), "x", ScriptFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("migrations"));
    }

    #[test]
    fn invalid_name_is_reported() {
        let tmp = tempdir().unwrap();

        let err = cmd_add(tmp.path(), "../escape", ScriptFormat::Yaml).unwrap_err();

        assert!(format!("{err:#}").contains("invalid migration name"));
    }
}
