//! Utilities for path collection and output-name conflict resolution.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Patterns are expanded in input order so the caller's ordering carries
/// through to the registry. A pattern that matches nothing contributes no
/// paths but is not an error; a literal path with no glob metacharacters
/// passes through as-is even when the file does not exist (the registry
/// filters missing files).
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from the glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.tif"`
/// - `"./scans/*.jpg"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let pattern = pattern.as_ref();

    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| Error::Other {
        message: err.to_string(),
    })?;

    for entry in paths {
        let path = entry.map_err(|err| Error::Other {
            message: err.to_string(),
        })?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Resolve an output path that may collide with an existing file.
///
/// Returns `candidate` unchanged when nothing occupies it. Otherwise appends
/// `_1`, `_2`, ... to the file stem (before the extension) and returns the
/// first variant that does not exist.
pub fn resolve_conflict(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = candidate.extension().and_then(|e| e.to_str());

    let mut counter = 1u64;
    loop {
        let name = match extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let attempt = candidate.with_file_name(name);
        if !attempt.exists() {
            return attempt;
        }
        counter += 1;
    }
}
