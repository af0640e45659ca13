use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::errors::IngestionError;
use super::job::IngestionJob;

/// Runs an [`IngestionJob`] at every instant of a cron schedule (seconds field included).
pub struct IngestionScheduler {
    schedule: Schedule,
    job: Arc<IngestionJob>,
}

impl IngestionScheduler {
    pub fn new(expr: &str, job: Arc<IngestionJob>) -> Result<Self, IngestionError> {
        let schedule = Schedule::from_str(expr).map_err(|e| IngestionError::Config(format!("schedule '{expr}': {e}")))?;
        Ok(Self { schedule, job })
    }

    /// First fire time strictly after `after`.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Spawn the loop on the current runtime. Ticks never overlap; a slow
    /// run makes the loop skip to the next instant after it finishes.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(service = "ingestion", event = "scheduler_start");
            loop {
                let now = Utc::now();
                let Some(next) = self.next_fire(now) else {
                    warn!(service = "ingestion", event = "schedule_exhausted");
                    break;
                };
                let wait = (next - now).to_std().unwrap_or_default();
                debug!(next = %next, wait_ms = wait.as_millis() as u64, "ingestion_sleep");
                tokio::time::sleep(wait).await;
                self.job.tick().await;
            }
        })
    }
}
