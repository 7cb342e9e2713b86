use std::fs;
use std::path::Path;

use pgmigrate_config::ScriptFormat;
use pgmigrate_core::{MigrateError, is_reserved, split_timestamp};

/// List migration files in `dir`, sorted by file name.
///
/// Names are timestamp-prefixed, so the textual order is the creation order
/// and the order migrations must be applied in.
pub fn discover(dir: &Path) -> Result<Vec<String>, MigrateError> {
    if !dir.is_dir() {
        return Err(MigrateError::NotFound(format!(
            "migration directory {}",
            dir.display()
        )));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // follows symlinks
        if !path.is_file() {
            if entry.file_type()?.is_symlink() {
                tracing::warn!(
                    path = %path.display(),
                    "skipping symlink that does not point to a file"
                );
            }
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if is_reserved(&name) || ScriptFormat::from_file_name(&name).is_none() {
            continue;
        }
        if split_timestamp(&name).is_none() {
            tracing::warn!(file = %name, "migration file name has no timestamp prefix");
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), "up: ''\ndown: ''\n").unwrap();
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = discover(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, MigrateError::NotFound(_)));
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(discover(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn sorts_by_name_not_creation_order() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "1_a.yaml");
        touch(&tmp, "3_c.yaml");
        touch(&tmp, "2_b.yaml");

        assert_eq!(discover(tmp.path()).unwrap(), vec!["1_a.yaml", "2_b.yaml", "3_c.yaml"]);
    }

    #[test]
    fn filters_extensions_and_reserved_names() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "1602549074_users.yaml");
        touch(&tmp, "1602549075_posts.json");
        touch(&tmp, "1602549076_tags.yml");
        touch(&tmp, "1602549077_notes.txt");
        touch(&tmp, "__init__.yaml");
        touch(&tmp, ".1602549078_hidden.yaml");
        fs::create_dir(tmp.path().join("1602549079_dir.yaml")).unwrap();

        assert_eq!(
            discover(tmp.path()).unwrap(),
            vec![
                "1602549074_users.yaml",
                "1602549075_posts.json",
                "1602549076_tags.yml"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_files() {
        let tmp = TempDir::new().unwrap();
        let real = TempDir::new().unwrap();
        touch(&real, "1_a.yaml");
        std::os::unix::fs::symlink(real.path().join("1_a.yaml"), tmp.path().join("1_a.yaml"))
            .unwrap();
        std::os::unix::fs::symlink(real.path().join("gone.yaml"), tmp.path().join("2_b.yaml"))
            .unwrap();

        assert_eq!(discover(tmp.path()).unwrap(), vec!["1_a.yaml"]);
    }

    #[test]
    fn keeps_files_without_timestamp_prefix() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "seed.yaml");
        assert_eq!(discover(tmp.path()).unwrap(), vec!["seed.yaml"]);
    }
}
