//! Build error types.

use std::path::PathBuf;

/// Error that aborts a sidebar build.
///
/// Non-fatal conditions (unknown `order` entries, unreadable title candidates)
/// are logged and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Directory listing or stat failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Sidecar metadata file is not valid JSON of the expected shape.
    #[error("Invalid sidebar metadata in {}: {source}", path.display())]
    InvalidMeta {
        /// Path to the sidecar file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A locale entry has no language tag.
    #[error("`lang` is required in locale config (locale `{0}`)")]
    MissingLocaleLang(String),

    /// A configured regex does not compile.
    #[error("Invalid pattern in {field}: {source}")]
    InvalidPattern {
        /// Config field the pattern came from.
        field: &'static str,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Site configuration document has an unexpected shape.
    #[error("Invalid site config: {0}")]
    InvalidSite(String),
}

impl BuildError {
    /// Create an I/O error with path context.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
