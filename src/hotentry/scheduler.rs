//! Background refresh of the hot entry snapshot.
//!
//! A single tokio task fetches entries at a fixed interval and writes them
//! into the [`EntryStore`]. The first refresh runs as soon as the task
//! starts. A failed refresh is logged and leaves the store untouched.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::hotentry::client::UpstreamClient;
use crate::hotentry::store::EntryStore;
use crate::Result;

/// Default refresh interval in seconds (5 minutes).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Shortest accepted refresh interval in seconds.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 1;

/// Periodic refresher for the entry store.
pub struct RefreshScheduler {
    client: UpstreamClient,
    store: Arc<EntryStore>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Create a new scheduler with the default interval.
    pub fn new(client: UpstreamClient, store: Arc<EntryStore>) -> Self {
        Self::with_interval(client, store, DEFAULT_REFRESH_INTERVAL_SECS)
    }

    /// Create a new scheduler with a custom interval.
    ///
    /// Intervals below [`MIN_REFRESH_INTERVAL_SECS`] are raised to it.
    pub fn with_interval(client: UpstreamClient, store: Arc<EntryStore>, interval_secs: u64) -> Self {
        if interval_secs < MIN_REFRESH_INTERVAL_SECS {
            warn!(
                interval_secs,
                "Refresh interval too short, using {} seconds", MIN_REFRESH_INTERVAL_SECS
            );
        }

        Self {
            client,
            store,
            interval: Duration::from_secs(interval_secs.max(MIN_REFRESH_INTERVAL_SECS)),
            task: Mutex::new(None),
        }
    }

    /// Refresh interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one refresh now. Returns the number of entries stored.
    pub async fn refresh_now(&self) -> Result<usize> {
        update_snapshot(&self.client, &self.store).await
    }

    /// Start the background task.
    ///
    /// Must be called from within a tokio runtime. Returns `false` without
    /// doing anything if the task is already running.
    pub fn start(&self) -> bool {
        let mut task = self.lock_task();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let client = self.client.clone();
        let store = self.store.clone();
        let period = self.interval;
        *task = Some(tokio::spawn(async move {
            run(client, store, period).await;
        }));

        info!(
            "Hot entry refresh started (interval: {} seconds)",
            period.as_secs()
        );
        true
    }

    /// Stop the background task. No-op if it is not running.
    pub fn stop(&self) {
        if let Some(handle) = self.lock_task().take() {
            handle.abort();
            info!("Hot entry refresh stopped");
        }
    }

    /// Check whether the background task is running.
    pub fn is_running(&self) -> bool {
        self.lock_task()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Refresh loop. Individual failures never end it.
async fn run(client: UpstreamClient, store: Arc<EntryStore>, period: Duration) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        timer.tick().await;
        // Errors are already logged inside update_snapshot
        let _ = update_snapshot(&client, &store).await;
    }
}

/// Fetch entries and write them into the store on success.
async fn update_snapshot(client: &UpstreamClient, store: &EntryStore) -> Result<usize> {
    match client.fetch_entries().await {
        Ok(entries) => {
            let count = entries.len();
            store.write(entries);
            info!(count, "Hot entry snapshot updated");
            Ok(count)
        }
        Err(e) => {
            error!(error = %e, "Failed to update hot entry snapshot");
            Err(e)
        }
    }
}
