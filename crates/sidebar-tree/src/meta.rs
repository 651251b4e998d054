//! Per-directory sidecar metadata.
//!
//! A directory may contain a JSON sidecar (default `.sidebar.meta.json`):
//!
//! ```json
//! { "title": "User Guide", "order": ["install.md", "advanced", "faq.md"] }
//! ```
//!
//! `title` overrides the directory's label in its parent. `order` lists the
//! directory's own children by filesystem name; children not listed are
//! dropped.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::BuildError;

/// Parsed sidecar contents. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MetaDescriptor {
    /// Label override for the directory.
    #[serde(default)]
    pub title: Option<String>,
    /// Explicit child ordering by entry name.
    #[serde(default)]
    pub order: Option<Vec<String>>,
}

/// Load the sidecar from `dir`, if one exists.
///
/// # Errors
///
/// Returns `BuildError::InvalidMeta` if the file is not valid JSON of the
/// expected shape, or `BuildError::Io` if it exists but cannot be read.
pub fn load_meta(dir: &Path, filename: &str) -> Result<Option<MetaDescriptor>, BuildError> {
    let path = dir.join(filename);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BuildError::io(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| BuildError::InvalidMeta { path, source })
}

/// Reorder `named` items to follow `order`, dropping anything not listed.
///
/// Names in `order` that match no item are skipped. Each item is emitted at
/// most once. Logs a warning for unmatched names and for dropped items.
pub(crate) fn apply_order<T>(named: Vec<(String, T)>, order: &[String], meta_path: &Path) -> Vec<T> {
    let original_len = named.len();
    let mut slots: Vec<Option<(String, T)>> = named.into_iter().map(Some).collect();

    let mut result = Vec::with_capacity(order.len().min(original_len));
    let mut unmatched = 0usize;
    for wanted in order {
        let position = slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|(name, _)| name == wanted));
        match position.and_then(|i| slots[i].take()) {
            Some((_, item)) => result.push(item),
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        tracing::warn!(
            path = %meta_path.display(),
            unmatched,
            order = order.len(),
            items = original_len,
            "Some items in the metadata order are not found"
        );
    }

    if result.len() != original_len {
        tracing::warn!(
            path = %meta_path.display(),
            dropped = original_len - result.len(),
            items = original_len,
            "Some items are not listed in the metadata order"
        );
    }

    result
}
