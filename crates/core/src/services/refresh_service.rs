use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use super::query_service::QueryService;
use crate::models::snapshot::SnapshotStatus;

/// Background timers of the client.
///
/// - **Price refresh**: every `price_update_interval` minutes (backend
///   setting; 0 disables it), asks the backend to update market prices and
///   invalidates the cached portfolio. The first run happens one full
///   interval after start.
/// - **Snapshot polling**: every `snapshot_poll_secs`, refetches the snapshot
///   status and publishes it on a watch channel, starting immediately.
///
/// A failed tick is logged and the timer keeps going. Tasks are aborted on
/// [`RefreshScheduler::stop`] or drop. Must be started inside a tokio runtime.
pub struct RefreshScheduler {
    status: watch::Receiver<Option<SnapshotStatus>>,
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn start(queries: Arc<QueryService>, price_update_minutes: u32, snapshot_poll_secs: u64) -> Self {
        let (tx, status) = watch::channel(queries.last_known_snapshot_status());
        let mut tasks = Vec::with_capacity(2);

        if price_update_minutes > 0 {
            let period = Duration::from_secs(u64::from(price_update_minutes) * 60);
            tasks.push(tokio::spawn(price_refresh_loop(Arc::clone(&queries), period)));
            tracing::info!(minutes = price_update_minutes, "Auto price refresh enabled");
        } else {
            tracing::debug!("Auto price refresh disabled");
        }

        if snapshot_poll_secs > 0 {
            let period = Duration::from_secs(snapshot_poll_secs);
            tasks.push(tokio::spawn(snapshot_poll_loop(queries, period, tx)));
        }

        Self { status, tasks }
    }

    /// Latest snapshot status seen by the poller.
    pub fn snapshot_status(&self) -> Option<SnapshotStatus> {
        self.status.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot status.
    pub fn subscribe(&self) -> watch::Receiver<Option<SnapshotStatus>> {
        self.status.clone()
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }

    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("tasks", &self.tasks.len())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn price_refresh_loop(queries: Arc<QueryService>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(e) = queries.update_prices().await {
            tracing::warn!(error = %e, "Scheduled price update failed");
        }
    }
}

async fn snapshot_poll_loop(
    queries: Arc<QueryService>,
    period: Duration,
    tx: watch::Sender<Option<SnapshotStatus>>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match queries.poll_snapshot_status().await {
            Ok(status) => {
                // Every receiver gone: nobody left to notify.
                if tx.send(Some(status)).is_err() {
                    tracing::debug!("Snapshot status receivers dropped, stopping poller");
                    return;
                }
            }
            Err(e) => tracing::warn!(error = %e, "Snapshot status poll failed"),
        }
    }
}
