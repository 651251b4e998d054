//! Directory listing in traversal order.

use std::fs;
use std::path::Path;

use crate::error::BuildError;
use crate::options::Hooks;

/// Index file names, in probe order.
pub const INDEX_FILES: [&str; 2] = ["index.md", "index.MD"];

/// Returns true if `name` is a directory index file.
#[must_use]
pub fn is_index_file(name: &str) -> bool {
    INDEX_FILES.contains(&name)
}

/// List the immediate children of `dir` in traversal order.
///
/// Names are byte-sorted, then the index file (if any) is moved to the
/// front. The `before_create_items` hook sees the result last.
///
/// # Errors
///
/// Returns `BuildError::Io` if the directory cannot be read.
pub fn list_entries(dir: &Path, hooks: &Hooks) -> Result<Vec<String>, BuildError> {
    let names = sorted_names(dir)?;
    Ok((hooks.before_create_items)(index_first(names)))
}

/// Byte-sorted UTF-8 entry names of `dir`.
pub(crate) fn sorted_names(dir: &Path) -> Result<Vec<String>, BuildError> {
    let read_dir = fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!(dir = %dir.display(), name = ?raw, "Skipping non-UTF-8 entry");
            }
        }
    }
    names.sort_unstable();

    Ok(names)
}

/// Index files first in `INDEX_FILES` order, everything else in original order.
fn index_first(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_key(|name| {
        INDEX_FILES
            .iter()
            .position(|index| index == name)
            .unwrap_or(INDEX_FILES.len())
    });
    names
}
