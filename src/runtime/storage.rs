use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Serialize, Deserialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::info;

/// Fixed epoch the monotonic `time_order` offset is measured from. Keeps
/// record ordering independent of clock string formatting.
pub const MAGIC_EPOCH_SECS: i64 = 1_270_000_000;

/// Status component value meaning "unchanged from the previous record".
pub const IDEM: &str = "idem";

/// One update pushed into the log. Any of the three status components can
/// be left at `"idem"` to carry the previous value forward.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: String,
    pub minor_status: String,
    pub application_status: String,
    /// Recorded timestamp; `None` stamps the current UTC time.
    pub date: Option<DateTime<Utc>>,
    pub source: String,
}

impl Default for StatusUpdate {
    fn default() -> Self {
        Self {
            status: IDEM.to_string(),
            minor_status: IDEM.to_string(),
            application_status: IDEM.to_string(),
            date: None,
            source: "Unknown".to_string(),
        }
    }
}

impl StatusUpdate {
    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn minor(mut self, minor_status: &str) -> Self {
        self.minor_status = minor_status.to_string();
        self
    }

    pub fn application(mut self, application_status: &str) -> Self {
        self.application_status = application_status.to_string();
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }
}

/// 状态日志记录 (带原始时间与单调序)
/// The literal datetime is kept for display; ordering uses `time_order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusRecord {
    pub status: String,
    pub minor_status: String,
    pub application_status: String,
    pub status_time: DateTime<Utc>,
    /// Seconds since `MAGIC_EPOCH_SECS`, millisecond precision.
    pub time_order: f64,
    pub source: String,
}

/// Per-status transition times of one job, restored to absolute epoch
/// seconds, plus the time of the latest record.
#[derive(Debug, Clone, Default)]
pub struct JobTimestamps {
    pub by_status: HashMap<String, f64>,
    pub last_time: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait StatusLog: Send + Sync {
    async fn add_record(&self, job_id: u64, update: StatusUpdate) -> Result<()>;

    /// Effective status history in time order. `"idem"` components carry
    /// the last explicit value forward; an application status that was
    /// never set renders as `"Unknown"`.
    async fn job_history(&self, job_id: u64) -> Result<Vec<StatusRecord>>;

    async fn timestamps(&self, job_id: u64) -> Result<JobTimestamps>;

    async fn delete_job(&self, job_id: u64) -> Result<()>;
}

// --- In-Memory Implementation ---

pub struct InMemoryStatusLog {
    // Map<JobID, records in insertion order>
    records: DashMap<u64, Vec<StatusRecord>>,
}

impl InMemoryStatusLog {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for InMemoryStatusLog {
    fn default() -> Self {
        Self::new()
    }
}

fn time_order_of(date: DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64 / 1000.0 - MAGIC_EPOCH_SECS as f64
}

#[async_trait]
impl StatusLog for InMemoryStatusLog {
    async fn add_record(&self, job_id: u64, update: StatusUpdate) -> Result<()> {
        info!(
            job_id,
            status = %update.status,
            minor = %update.minor_status,
            application = %update.application_status,
            source = %update.source,
            "Adding logging record"
        );

        let status_time = update.date.unwrap_or_else(Utc::now);
        let mut application_status = update.application_status;
        // Column width of the original store.
        application_status.truncate(255);

        let record = StatusRecord {
            status: update.status,
            minor_status: update.minor_status,
            application_status,
            status_time,
            time_order: time_order_of(status_time),
            source: update.source,
        };
        self.records.entry(job_id).or_default().push(record);
        Ok(())
    }

    async fn job_history(&self, job_id: u64) -> Result<Vec<StatusRecord>> {
        let mut ordered = self
            .records
            .get(&job_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| anyhow!("No logging information for job {}", job_id))?;

        ordered.sort_by(|a, b| {
            a.time_order
                .partial_cmp(&b.time_order)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.status_time.cmp(&b.status_time))
        });

        let mut status = ordered[0].status.clone();
        let mut minor = ordered[0].minor_status.clone();
        let mut application = ordered[0].application_status.clone();
        if application == IDEM {
            application = "Unknown".to_string();
        }

        let mut resolved = Vec::with_capacity(ordered.len());
        for record in ordered {
            if record.status != IDEM {
                status = record.status.clone();
            }
            if record.minor_status != IDEM {
                minor = record.minor_status.clone();
            }
            if record.application_status != IDEM {
                application = record.application_status.clone();
            }
            resolved.push(StatusRecord {
                status: status.clone(),
                minor_status: minor.clone(),
                application_status: application.clone(),
                ..record
            });
        }
        Ok(resolved)
    }

    async fn timestamps(&self, job_id: u64) -> Result<JobTimestamps> {
        let entry = self
            .records
            .get(&job_id)
            .ok_or_else(|| anyhow!("No logging information for job {}", job_id))?;

        let mut by_status = HashMap::new();
        for record in entry.value() {
            by_status.insert(
                record.status.clone(),
                record.time_order + MAGIC_EPOCH_SECS as f64,
            );
        }
        let last_time = entry.value().iter().map(|r| r.status_time).max();

        Ok(JobTimestamps {
            by_status,
            last_time,
        })
    }

    async fn delete_job(&self, job_id: u64) -> Result<()> {
        self.records.remove(&job_id);
        Ok(())
    }
}
