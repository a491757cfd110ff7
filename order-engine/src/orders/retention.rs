//! Retention sweep for delivered orders
//!
//! Delivered orders stay readable for a while (the customer tracker shows the
//! final state), then the sweep drops their snapshots, events, notifications
//! and the processed command IDs of the same age.

use std::sync::Arc;
use std::time::Duration;

use shared::util::now_millis;
use tokio_util::sync::CancellationToken;

use super::manager::OrdersManager;

/// Periodic task that prunes delivered orders
///
/// Registered as `TaskKind::Periodic` in `start_background_tasks()`.
pub struct RetentionWorker {
    manager: Arc<OrdersManager>,
    retention: Duration,
    interval: Duration,
    shutdown: CancellationToken,
}

impl RetentionWorker {
    pub fn new(
        manager: Arc<OrdersManager>,
        retention: Duration,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            manager,
            retention,
            interval,
            shutdown,
        }
    }

    /// One sweep at `now`, returns how many orders were removed
    pub fn sweep(&self, now: i64) -> usize {
        let retention_ms = i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX);
        self.manager.prune_delivered(now.saturating_sub(retention_ms))
    }

    pub async fn run(self) {
        tracing::info!(
            retention_secs = self.retention.as_secs(),
            interval_secs = self.interval.as_secs(),
            "Retention worker started"
        );

        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Retention worker received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep(now_millis());
                }
            }
        }
    }
}
