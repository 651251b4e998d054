//! Rebuild driver for structural changes.

use std::fmt::Display;

use crate::event::{ChangeEvent, ChangeEventReceiver};

/// A full sidebar rebuild.
///
/// Implemented for any `FnMut() -> Result<(), E>` closure.
pub trait Rebuild {
    /// Error reported by a failed rebuild.
    type Error: Display;

    /// Recompute and publish the sidebar from the current filesystem state.
    fn rebuild(&mut self) -> Result<(), Self::Error>;
}

impl<F, E> Rebuild for F
where
    F: FnMut() -> Result<(), E>,
    E: Display,
{
    type Error = E;

    fn rebuild(&mut self) -> Result<(), E> {
        self()
    }
}

/// Triggers a rebuild on every structural change event.
///
/// In-place content edits are ignored. A failed rebuild is logged and the
/// watcher keeps going; whatever the last successful rebuild published
/// stays in effect.
pub struct ChangeWatcher<R> {
    rebuild: R,
}

impl<R: Rebuild> ChangeWatcher<R> {
    /// Create a watcher around a rebuild action.
    #[must_use]
    pub fn new(rebuild: R) -> Self {
        Self { rebuild }
    }

    /// Handle one event. Returns true if a rebuild was attempted.
    pub fn handle(&mut self, event: &ChangeEvent) -> bool {
        if !event.kind.is_structural() {
            tracing::debug!(path = %event.path.display(), "Content changed, sidebar unaffected");
            return false;
        }

        tracing::info!(
            path = %event.path.display(),
            kind = ?event.kind,
            "Structure changed, rebuilding sidebar"
        );
        match self.rebuild.rebuild() {
            Ok(()) => tracing::info!("Sidebar rebuilt"),
            Err(e) => tracing::error!(error = %e, "Sidebar rebuild failed"),
        }
        true
    }

    /// Handle events until the receiver's sender is dropped.
    ///
    /// Rebuilds run one at a time on the calling thread; events that arrive
    /// during a rebuild wait in the channel.
    pub fn run(&mut self, events: &ChangeEventReceiver) {
        for event in events.iter() {
            self.handle(&event);
        }
    }
}
