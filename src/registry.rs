//! The ordered file registry backing a docbind session.
//!
//! The registry owns the user-curated list of input files. It enforces the
//! supported-extension filter and the exact-path uniqueness invariant on
//! `add`, and provides the reorder and on-disk rename operations the
//! presentation layer drives. Entry order is significant: it determines the
//! merge and export order.
//!
//! # Examples
//!
//! ```no_run
//! use docbind::registry::FileRegistry;
//! use std::path::PathBuf;
//!
//! let mut registry = FileRegistry::new();
//! let added = registry.add(vec![PathBuf::from("scan.tif"), PathBuf::from("notes.pdf")]);
//! println!("Added {added} file(s)");
//! for entry in registry.list() {
//!     println!("{}", entry.display_name);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// File extensions accepted by the registry (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "tif", "tiff", "jpg", "jpeg"];

/// Check whether a path carries a supported extension (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// One user-curated input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Name shown to the user (the file name component of `path`).
    pub display_name: String,

    /// Path of the file on disk.
    pub path: PathBuf,
}

impl FileEntry {
    fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { display_name, path }
    }
}

/// Ordered collection of input files with add/remove/reorder/rename support.
///
/// Invariant: no two entries share the same path (exact match).
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

impl FileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add candidate paths to the registry, preserving input order.
    ///
    /// Candidates that are not regular files, carry an unsupported
    /// extension, or are already present (exact path match) are silently
    /// skipped. Returns the number of entries actually added.
    pub fn add<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if !path.is_file() {
                debug!(path = %path.display(), "skipping: not a regular file");
                continue;
            }
            if !is_supported(&path) {
                debug!(path = %path.display(), "skipping: unsupported extension");
                continue;
            }
            if self.contains(&path) {
                debug!(path = %path.display(), "skipping: already listed");
                continue;
            }
            self.entries.push(FileEntry::new(path));
            added += 1;
        }
        added
    }

    /// Remove the entries at the given indices.
    ///
    /// Out-of-range indices are ignored; an empty selection is a no-op.
    pub fn remove(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.entries.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        // Remove from the back so earlier indices stay valid.
        for index in sorted.into_iter().rev() {
            self.entries.remove(index);
        }
    }

    /// Move the selected entries by `offset` positions.
    ///
    /// The move is applied one step at a time. Within a step, entries
    /// blocked by the list boundary stay in place, and selected entries
    /// stacked behind them stay in place too, so a contiguous selection
    /// shifted against a boundary keeps its relative order instead of
    /// folding over itself. Out-of-range indices are ignored.
    pub fn reorder(&mut self, indices: &[usize], offset: isize) {
        if offset == 0 || self.entries.is_empty() {
            return;
        }

        let mut rows: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.entries.len())
            .collect();
        rows.sort_unstable();
        rows.dedup();
        if rows.is_empty() {
            return;
        }

        let step = offset.signum();
        for _ in 0..offset.unsigned_abs() {
            rows = self.shift_once(&rows, step);
        }
    }

    /// Shift the selection a single slot towards `step` (-1 up, +1 down).
    ///
    /// Returns the selection's new row positions.
    fn shift_once(&mut self, rows: &[usize], step: isize) -> Vec<usize> {
        let mut moved = Vec::with_capacity(rows.len());

        if step < 0 {
            // Upward: process lowest index first so each swap target is
            // already vacated (or genuinely occupied by an unselected entry).
            let mut floor = 0usize;
            for &row in rows {
                if row <= floor {
                    // Stacked against the top boundary.
                    floor = row + 1;
                    moved.push(row);
                } else {
                    self.entries.swap(row, row - 1);
                    moved.push(row - 1);
                }
            }
        } else {
            // Downward: process highest index first, mirroring the upward case.
            let mut ceiling = self.entries.len() - 1;
            for &row in rows.iter().rev() {
                if row >= ceiling {
                    // Stacked against the bottom boundary.
                    ceiling = row.saturating_sub(1);
                    moved.push(row);
                } else {
                    self.entries.swap(row, row + 1);
                    moved.push(row + 1);
                }
            }
            moved.reverse();
        }

        moved
    }

    /// Rename the entry at `index` on disk and update the registry.
    ///
    /// If `new_name` has an extension it must be a supported one, otherwise
    /// the operation fails with [`Error::UnsupportedExtension`]. A name
    /// without an extension inherits the entry's current extension. If the
    /// resolved target already exists and the caller has not confirmed the
    /// overwrite, the operation fails with [`Error::NameConflictDeclined`].
    /// OS-level rename failures surface as [`Error::RenameFailed`] and leave
    /// both the file and the registry entry unchanged.
    ///
    /// Returns the new path on success.
    pub fn rename(&mut self, index: usize, new_name: &str, overwrite_confirmed: bool) -> Result<PathBuf> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| Error::other(format!("No file at position {index}")))?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(Error::other("New file name must not be empty"));
        }

        let resolved_name = if Path::new(new_name).extension().is_some() {
            if !is_supported(Path::new(new_name)) {
                return Err(Error::unsupported_extension(new_name));
            }
            new_name.to_string()
        } else {
            // Inherit the entry's current extension.
            match entry.path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) => format!("{new_name}.{ext}"),
                None => new_name.to_string(),
            }
        };

        let target = entry.path.with_file_name(&resolved_name);
        if target == entry.path {
            return Ok(target);
        }
        if target.exists() && !overwrite_confirmed {
            return Err(Error::NameConflictDeclined { path: target });
        }

        fs::rename(&entry.path, &target).map_err(|source| Error::RenameFailed {
            from: entry.path.clone(),
            to: target.clone(),
            source,
        })?;

        debug!(from = %entry.path.display(), to = %target.display(), "renamed file");

        let entry = &mut self.entries[index];
        entry.path = target.clone();
        entry.display_name = resolved_name;
        Ok(target)
    }

    /// Ordered view of the entries.
    pub fn list(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Ordered list of entry paths, as consumed by the pipelines.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }
}
