use crate::runner::SyncRunner;
use std::{sync::Arc, time::Duration};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs an incremental cycle on a fixed period, starting immediately.
pub struct SyncScheduler {
    runner: Arc<SyncRunner>,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(runner: Arc<SyncRunner>, interval: Duration) -> Self {
        Self { runner, interval }
    }

    /// Loops until `cancel` fires. A cycle already running when the token
    /// is cancelled is allowed to finish.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.interval.as_secs(), "Scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let published = self.runner.run_incremental().await;
                    debug!(published, "Scheduled cycle complete");
                }
            }
        }
    }
}
