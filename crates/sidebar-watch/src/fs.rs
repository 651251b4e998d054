//! Notify-backed watcher for the docs root.

use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use glob::Pattern;
use notify::{RecursiveMode, Watcher};

use crate::debouncer::EventDebouncer;
use crate::event::{ChangeEvent, ChangeEventKind, ChangeEventReceiver, WatchHandle};
use crate::WatchError;

/// Interval at which the drain thread polls the debouncer.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watches a docs root and emits debounced change events.
///
/// Scope: paths under the root matching any watch pattern, plus
/// directories. A directory is recognized by the event's folder kind, by
/// existing as a directory, or by being gone after a rename or removal.
#[derive(Debug)]
pub struct FsWatcher {
    root: PathBuf,
    patterns: Vec<Pattern>,
    debounce: Duration,
}

impl FsWatcher {
    /// Create a watcher for `root`.
    ///
    /// `patterns` are globs relative to `root` (e.g., `**/*.md`).
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidPattern` if a glob does not parse.
    pub fn new(
        root: impl Into<PathBuf>,
        patterns: &[String],
        debounce: Duration,
    ) -> Result<Self, WatchError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| WatchError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.into(),
            patterns,
            debounce,
        })
    }

    /// Start watching.
    ///
    /// Events are delivered with paths relative to the root. Dropping the
    /// returned handle stops the watcher.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Notify` if the OS watcher cannot be created or
    /// the root cannot be watched.
    pub fn watch(&self) -> Result<(ChangeEventReceiver, WatchHandle), WatchError> {
        let (event_tx, event_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let debouncer = Arc::new(EventDebouncer::new(self.debounce));

        let root = self.root.clone();
        let patterns = self.patterns.clone();
        let watcher_debouncer = Arc::clone(&debouncer);

        let mut watcher = notify::recommended_watcher(move |res| {
            record_notify_event(res, &watcher_debouncer, |path, kind| {
                in_scope(&root, &patterns, path, kind)
            });
        })?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;

        tracing::info!(root = %self.root.display(), "Watching for structural changes");

        // The watcher moves into the drain thread to stay alive with it
        let root = self.root.clone();
        thread::spawn(move || {
            let _watcher = watcher;

            loop {
                match shutdown_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                for (path, kind) in debouncer.drain_ready() {
                    let path = path
                        .strip_prefix(&root)
                        .map(Path::to_path_buf)
                        .unwrap_or(path);
                    if event_tx.send(ChangeEvent { path, kind }).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((
            ChangeEventReceiver::new(event_rx),
            WatchHandle::new(shutdown_tx),
        ))
    }
}

fn in_scope(root: &Path, patterns: &[Pattern], path: &Path, kind: notify::EventKind) -> bool {
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    if patterns.iter().any(|p| p.matches_path(relative)) {
        return true;
    }

    match kind {
        notify::EventKind::Create(CreateKind::Folder)
        | notify::EventKind::Remove(RemoveKind::Folder) => true,
        notify::EventKind::Create(CreateKind::File)
        | notify::EventKind::Remove(RemoveKind::File) => false,
        // A vanished path matching no file pattern may have been a directory
        notify::EventKind::Remove(_) | notify::EventKind::Modify(ModifyKind::Name(_)) => {
            path.is_dir() || !path.exists()
        }
        _ => path.is_dir(),
    }
}

/// Map a notify event kind for one of its paths.
///
/// Renames are reported per path: the side that still exists is a creation,
/// the side that is gone is a removal. Access and metadata-only events are
/// dropped.
fn change_kind(kind: notify::EventKind, path: &Path) -> Option<ChangeEventKind> {
    use notify::event::ModifyKind;

    match kind {
        notify::EventKind::Create(_) => Some(ChangeEventKind::Created),
        notify::EventKind::Modify(ModifyKind::Name(_)) => Some(if path.exists() {
            ChangeEventKind::Created
        } else {
            ChangeEventKind::Removed
        }),
        notify::EventKind::Modify(ModifyKind::Metadata(_)) => None,
        notify::EventKind::Modify(_) => Some(ChangeEventKind::Modified),
        notify::EventKind::Remove(_) => Some(ChangeEventKind::Removed),
        _ => None,
    }
}

fn record_notify_event(
    res: Result<notify::Event, notify::Error>,
    debouncer: &EventDebouncer,
    filter: impl Fn(&Path, notify::EventKind) -> bool,
) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Watcher error");
            return;
        }
    };
    for path in event.paths {
        if !filter(&path, event.kind) {
            continue;
        }
        if let Some(kind) = change_kind(event.kind, &path) {
            tracing::debug!(path = %path.display(), ?kind, "Recorded filesystem event");
            debouncer.record(path, kind);
        }
    }
}
