use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Downstream component recalculating scheduling shares across queued
/// work. Zero-argument and periodic; implementations live outside this
/// crate.
#[async_trait]
pub trait ShareRecalculator: Send + Sync {
    async fn recalculate_shares(&self) -> Result<()>;
}

/// Periodic trigger for share recalculation. A failing cycle is logged
/// and absorbed, never escalated, and never blocks the next cycle.
pub struct TaskQueueAgent {
    recalculator: Arc<dyn ShareRecalculator>,
    poll_interval: Duration,
}

impl TaskQueueAgent {
    pub fn new(recalculator: Arc<dyn ShareRecalculator>, poll_interval: Duration) -> Self {
        Self {
            recalculator,
            poll_interval,
        }
    }

    /// One trigger cycle. Always succeeds from the caller's point of view.
    pub async fn execute(&self) {
        if let Err(e) = self.recalculator.recalculate_shares().await {
            error!(error = %e, "Error recalculating task queue shares");
        }
    }

    pub async fn run(&self) {
        info!(interval = ?self.poll_interval, "Task queue agent started");
        let mut ticker = interval(self.poll_interval);
        loop {
            ticker.tick().await;
            self.execute().await;
        }
    }
}
