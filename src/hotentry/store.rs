//! In-memory store for the latest hot entry snapshot.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::hotentry::types::{Entry, Snapshot};

/// Holder of the most recent [`Snapshot`].
///
/// Lock discipline: the mutex guards only the snapshot value. `write` swaps
/// in a fully built snapshot and `read` clones out the `Arc`, so no I/O
/// ever happens while the lock is held. Last write wins.
#[derive(Debug, Default)]
pub struct EntryStore {
    snapshot: Mutex<Snapshot>,
}

impl EntryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, or the empty one before the first write.
    pub fn read(&self) -> Snapshot {
        self.lock().clone()
    }

    /// Replace the snapshot with `entries`, stamped with the current time.
    pub fn write(&self, entries: Vec<Entry>) {
        let snapshot = Snapshot::new(entries, Utc::now());
        *self.lock() = snapshot;
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        // A panic while holding the lock cannot leave a half-written
        // snapshot behind, so a poisoned lock is still usable.
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
