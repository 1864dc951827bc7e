use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqforge::runtime::agent::{ShareRecalculator, TaskQueueAgent};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct CountingRecalculator {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingRecalculator {
    fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

#[async_trait]
impl ShareRecalculator for CountingRecalculator {
    async fn recalculate_shares(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(anyhow!("shares backend unavailable"))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn test_execute_triggers_recalculation() {
    let recalculator = Arc::new(CountingRecalculator::new(false));
    let agent = TaskQueueAgent::new(recalculator.clone(), Duration::from_millis(10));

    agent.execute().await;
    assert_eq!(recalculator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_execute_absorbs_recalculation_failure() {
    let recalculator = Arc::new(CountingRecalculator::new(true));
    let agent = TaskQueueAgent::new(recalculator.clone(), Duration::from_millis(10));

    // A failing cycle is logged, not escalated
    agent.execute().await;
    agent.execute().await;
    assert_eq!(recalculator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_run_keeps_ticking_past_failures() {
    let recalculator = Arc::new(CountingRecalculator::new(true));
    let agent = TaskQueueAgent::new(recalculator.clone(), Duration::from_millis(10));

    tokio::select! {
        _ = agent.run() => {}
        _ = tokio::time::sleep(Duration::from_millis(55)) => {}
    }

    // First tick fires immediately, later ones despite failures
    assert!(recalculator.calls.load(Ordering::SeqCst) >= 3);
}
