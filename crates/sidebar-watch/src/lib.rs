//! Structural change watching for sidebar rebuilds.
//!
//! [`FsWatcher`] watches a docs root with `notify`, debounces raw events per
//! path, and delivers [`ChangeEvent`]s over a channel. [`ChangeWatcher`]
//! consumes those events and runs a full rebuild on every creation or
//! removal; in-place content edits never change the tree and are ignored.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use sidebar_watch::{ChangeWatcher, FsWatcher};
//!
//! let watcher = FsWatcher::new("docs", &["**/*.md".to_owned()], Duration::from_millis(100))?;
//! let (events, _handle) = watcher.watch()?;
//! ChangeWatcher::new(|| rebuild_sidebar()).run(&events);
//! ```

mod debouncer;
mod event;
mod fs;
mod watcher;

pub use event::{ChangeEvent, ChangeEventKind, ChangeEventReceiver, WatchHandle};
pub use fs::FsWatcher;
pub use watcher::{ChangeWatcher, Rebuild};

/// Watcher setup error.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The OS watcher could not be created or attached.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// A watch pattern is not a valid glob.
    #[error("Invalid watch pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },
}
