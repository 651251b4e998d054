//! Per-path event coalescing.
//!
//! Editors and file managers emit bursts of events for one logical change.
//! Events for the same path are merged until the path has been quiet for
//! the debounce window.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::event::ChangeEventKind;

struct PendingEvent {
    kind: ChangeEventKind,
    deadline: Instant,
}

/// Thread-safe event debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, PendingEvent>>,
    window: Duration,
}

impl EventDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record a raw event, merging with any pending event for the same path.
    pub(crate) fn record(&self, path: PathBuf, kind: ChangeEventKind) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = Instant::now() + self.window;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(PendingEvent { kind, deadline });
            }
            Entry::Occupied(mut entry) => match coalesce(entry.get().kind, kind) {
                Some(merged) => {
                    let event = entry.get_mut();
                    event.kind = merged;
                    event.deadline = deadline;
                }
                None => {
                    entry.remove();
                }
            },
        }
    }

    /// Take all events whose deadline has passed.
    pub(crate) fn drain_ready(&self) -> Vec<(PathBuf, ChangeEventKind)> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let mut ready = Vec::new();
        pending.retain(|path, event| {
            if event.deadline <= now {
                ready.push((path.clone(), event.kind));
                false
            } else {
                true
            }
        });
        ready.sort_by(|a, b| a.0.cmp(&b.0));
        ready
    }
}

/// Merge two event kinds for one path. `None` discards both.
#[allow(clippy::match_same_arms)]
fn coalesce(existing: ChangeEventKind, new: ChangeEventKind) -> Option<ChangeEventKind> {
    use ChangeEventKind::{Created, Modified, Removed};

    match (existing, new) {
        (Created, Created | Modified) => Some(Created),
        (Created, Removed) => None, // Never existed for us
        (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
        (Modified, Removed) => Some(Removed),
        (Removed, Created) => Some(Modified), // Replaced
        (Removed, Modified | Removed) => Some(Removed),
    }
}
