use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use pgmigrate_config::ScriptFormat;
use pgmigrate_core::{MigrateError, migration_file_name, slugify};
use pgmigrate_loader::render_template;

/// Create a new migration file in `dir` stamped with the current Unix time.
pub fn add_migration(
    dir: &Path,
    name: &str,
    format: ScriptFormat,
) -> Result<PathBuf, MigrateError> {
    add_migration_at(dir, name, format, Utc::now().timestamp())
}

/// Create `<timestamp>_<slug>.<ext>` in `dir` from the migration template.
///
/// Never overwrites: an existing file with the same name is reported as a
/// conflict. The ledger is not touched.
pub fn add_migration_at(
    dir: &Path,
    name: &str,
    format: ScriptFormat,
    timestamp: i64,
) -> Result<PathBuf, MigrateError> {
    if !dir.is_dir() {
        return Err(MigrateError::NotFound(format!(
            "migration directory {}",
            dir.display()
        )));
    }

    let slug = slugify(name)?;
    let path = dir.join(migration_file_name(timestamp, &slug, format.extension())?);
    let contents = render_template(name.trim(), format).map_err(io::Error::other)?;

    create_new_with(&path, |file| file.write_all(contents.as_bytes()))?;

    tracing::info!(path = %path.display(), "migration file created");
    Ok(path)
}

/// Create `path` and fill it with `write`. A failed write removes the file again.
fn create_new_with<F>(path: &Path, write: F) -> Result<(), MigrateError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Err(MigrateError::Conflict(path.display().to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    if let Err(err) = write(&mut file) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(
                path = %path.display(),
                error = %cleanup,
                "removing partial file failed"
            );
        }
        return Err(err.into());
    }
    Ok(())
}
