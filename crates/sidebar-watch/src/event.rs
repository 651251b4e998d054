//! Change event types.

use std::path::PathBuf;
use std::sync::mpsc;

/// Kind of filesystem change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEventKind {
    /// File or directory was created.
    Created,
    /// File content was modified in place.
    Modified,
    /// File or directory was removed.
    Removed,
}

impl ChangeEventKind {
    /// Returns true if the change can alter the tree structure.
    #[must_use]
    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Modified)
    }
}

/// A debounced change under the docs root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path relative to the docs root (e.g., "guide/intro.md").
    pub path: PathBuf,
    /// Kind of change.
    pub kind: ChangeEventKind,
}

/// Receiver for change events.
///
/// Wraps a [`std::sync::mpsc::Receiver`] for synchronous event delivery.
pub struct ChangeEventReceiver {
    rx: mpsc::Receiver<ChangeEvent>,
}

impl ChangeEventReceiver {
    /// Create a receiver from a channel receiver.
    #[must_use]
    pub fn new(rx: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Try to receive an event without blocking.
    #[cfg(test)]
    pub(crate) fn try_recv(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Returns a blocking iterator that ends when the sender is dropped.
    pub fn iter(&self) -> impl Iterator<Item = ChangeEvent> + '_ {
        self.rx.iter()
    }
}

/// Handle to stop watching.
///
/// Dropping the handle stops the watcher: the shutdown sender disconnects
/// and the drain thread exits, taking the notify watcher with it.
pub struct WatchHandle {
    _shutdown: mpsc::Sender<()>,
}

impl WatchHandle {
    pub(crate) fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: shutdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_structural() {
        assert!(ChangeEventKind::Created.is_structural());
        assert!(ChangeEventKind::Removed.is_structural());
        assert!(!ChangeEventKind::Modified.is_structural());
    }

    #[test]
    fn test_receiver_iter_ends_on_disconnect() {
        let (tx, rx) = mpsc::channel();
        let receiver = ChangeEventReceiver::new(rx);

        let event = ChangeEvent {
            path: PathBuf::from("guide/a.md"),
            kind: ChangeEventKind::Created,
        };
        tx.send(event.clone()).unwrap();
        drop(tx);

        let received: Vec<_> = receiver.iter().collect();
        assert_eq!(received, vec![event]);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_receiver_try_recv_empty() {
        let (_tx, rx) = mpsc::channel();
        let receiver = ChangeEventReceiver::new(rx);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_watch_handle_drop_disconnects() {
        let (tx, rx) = mpsc::channel();
        drop(WatchHandle::new(tx));
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_handle_and_receiver_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WatchHandle>();
        assert_send::<ChangeEventReceiver>();
    }
}
