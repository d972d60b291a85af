//! Expiration Sweeper
//!
//! Background task that periodically removes expired records. It is the
//! only place records are expired; reads do not filter.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::Store;

/// Default pause between two sweep passes
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest accepted pause; shorter requests are raised to it
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Background sweep task for one `Store`
pub struct ExpirationSweeper {
    store: Store,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl ExpirationSweeper {
    /// Run the sweeper until shutdown is signalled or the handle is dropped
    pub async fn run(mut self) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        info!("Expiration sweeper started, interval: {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.store.cleanup_expired();
                    if removed > 0 {
                        debug!(removed = removed, "Swept expired keys");
                    }
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiration sweeper stopped");
    }

    /// Spawn the sweeper on the current tokio runtime
    pub fn spawn(store: Store, interval: Duration) -> SweeperHandle {
        if interval < MIN_SWEEP_INTERVAL {
            warn!(
                "Sweep interval {:?} too short, using {:?}",
                interval, MIN_SWEEP_INTERVAL
            );
        }
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = Self {
            store,
            interval,
            shutdown_rx,
        };
        SweeperHandle {
            shutdown_tx,
            task: tokio::spawn(sweeper.run()),
        }
    }
}

/// Owner of a running sweeper. Dropping it also stops the task.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!("Expiration sweeper failed: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_removes_expired() {
        let store = Store::new();
        store
            .set_ex("short", "v", Some(Duration::from_millis(10)))
            .unwrap();
        store.set("long", "v").unwrap();

        let handle = ExpirationSweeper::spawn(store.clone(), Duration::from_millis(25));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!store.exists("short"));
        assert!(store.exists("long"));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_interval_still_sweeps() {
        let store = Store::new();
        store.set_ex("gone", "v", Some(Duration::ZERO)).unwrap();

        let handle = ExpirationSweeper::spawn(store.clone(), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_finished());
        assert!(!store.exists("gone"));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let store = Store::new();
        let handle = ExpirationSweeper::spawn(store.clone(), Duration::from_millis(10));
        handle.shutdown().await;

        store
            .set_ex("k", "v", Some(Duration::from_millis(1)))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        // nobody swept it
        assert!(store.exists("k"));
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_task() {
        let store = Store::new();
        let handle = ExpirationSweeper::spawn(store.clone(), Duration::from_secs(3600));
        let task_store = store.clone();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(50)).await;
        // only the test's own clones remain once the task has exited
        assert_eq!(std::sync::Arc::strong_count(&task_store.inner), 2);
    }
}
