use crate::error::MigrateError;

/// File-name prefixes skipped by directory scans.
pub const RESERVED_PREFIXES: &[&str] = &["__", "."];

/// Longest file name the ledger can record, in characters.
pub const MAX_FILE_NAME_LEN: usize = 200;

/// Returns true when the file name starts with a reserved prefix.
pub fn is_reserved(file_name: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|p| file_name.starts_with(p))
}

/// Turn a human migration name into the slug part of a file name.
/// Whitespace runs become a single `_`.
pub fn slugify(name: &str) -> Result<String, MigrateError> {
    let slug = name.split_whitespace().collect::<Vec<_>>().join("_");
    if slug.is_empty() || slug.contains(['/', '\\']) {
        return Err(MigrateError::InvalidName(name.to_string()));
    }
    Ok(slug)
}

/// `<timestamp>_<slug>.<ext>`, rejected when the ledger could not hold it.
pub fn migration_file_name(
    timestamp: i64,
    slug: &str,
    ext: &str,
) -> Result<String, MigrateError> {
    let file_name = format!("{timestamp}_{slug}.{ext}");
    if file_name.chars().count() > MAX_FILE_NAME_LEN {
        return Err(MigrateError::InvalidName(slug.to_string()));
    }
    Ok(file_name)
}

/// Split a migration file name into its numeric prefix and the remainder.
/// Returns `None` when the name does not start with `<digits>_`.
pub fn split_timestamp(file_name: &str) -> Option<(i64, &str)> {
    let (prefix, rest) = file_name.split_once('_')?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let timestamp = prefix.parse().ok()?;
    Some((timestamp, rest))
}
