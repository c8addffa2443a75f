//! Cron Scheduler
//!
//! Arms one background task per enabled scheduled job. Each task sleeps
//! until the job's next cron fire time, runs the bound pipeline through the
//! run service, records the fire time, and goes back to sleep.
//!
//! The scheduler is an explicit service handle owned by main and shared
//! with the web layer; there are no module-level globals. Jobs armed here
//! survive until disarmed or until the process exits.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use aiops_core::domain::run::RunOptions;
use aiops_core::domain::schedule::ScheduledJob;
use chrono::Utc;
use cron::Schedule;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::repository::schedule_repository;
use crate::service::run_service;

/// Handle to the background scheduling service
#[derive(Clone)]
pub struct Scheduler {
    pool: PgPool,
    jobs: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
}

impl Scheduler {
    /// Construct the scheduler. No jobs are armed until
    /// [`load_enabled_jobs`](Self::load_enabled_jobs) or [`arm`](Self::arm)
    /// is called.
    pub fn start(pool: PgPool) -> Self {
        Self {
            pool,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm every enabled job from the database. Called once at startup.
    pub async fn load_enabled_jobs(&self) -> Result<usize, sqlx::Error> {
        let jobs = schedule_repository::list_enabled(&self.pool).await?;
        let count = jobs.len();

        for job in jobs {
            self.arm(job);
        }

        tracing::info!("Scheduler armed {} job(s)", count);
        Ok(count)
    }

    /// Arm a job, replacing any existing task for the same id
    pub fn arm(&self, job: ScheduledJob) {
        let schedule = match parse_cron(&job.cron_expr) {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::error!(
                    "Refusing to arm job '{}' with invalid cron '{}': {}",
                    job.name,
                    job.cron_expr,
                    e
                );
                return;
            }
        };

        let pool = self.pool.clone();
        let job_id = job.id;
        let handle = tokio::spawn(run_job_loop(pool, job, schedule));

        let mut jobs = match self.jobs.lock() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = jobs.insert(job_id, handle) {
            previous.abort();
        }
    }

    /// Disarm a job's background task, if one is armed
    pub fn disarm(&self, id: Uuid) {
        let mut jobs = match self.jobs.lock() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = jobs.remove(&id) {
            handle.abort();
            tracing::info!("Scheduler disarmed job {}", id);
        }
    }

    /// True if a background task is currently armed for the job
    pub fn is_armed(&self, id: Uuid) -> bool {
        let jobs = match self.jobs.lock() {
            Ok(jobs) => jobs,
            Err(poisoned) => poisoned.into_inner(),
        };
        jobs.contains_key(&id)
    }
}

/// Parse a cron expression, accepting the standard five-field form.
///
/// The underlying parser wants a seconds field; five-field expressions are
/// normalized to fire at second zero.
pub fn parse_cron(expr: &str) -> Result<Schedule, cron::error::Error> {
    let trimmed = expr.trim();
    if trimmed.split_whitespace().count() == 5 {
        Schedule::from_str(&format!("0 {}", trimmed))
    } else {
        Schedule::from_str(trimmed)
    }
}

/// Per-job background loop: sleep until the next fire time, run, repeat
async fn run_job_loop(pool: PgPool, job: ScheduledJob, schedule: Schedule) {
    loop {
        let next = match schedule.upcoming(Utc).next() {
            Some(next) => next,
            None => {
                tracing::warn!(
                    "Job '{}' has no future fire times; disarming",
                    job.name
                );
                return;
            }
        };

        let wait = match (next - Utc::now()).to_std() {
            Ok(wait) => wait,
            // Fire time already passed while computing; loop to the next one.
            Err(_) => continue,
        };

        tracing::debug!("Job '{}' sleeping until {}", job.name, next);
        tokio::time::sleep(wait).await;

        let fired_at = Utc::now();
        tracing::info!("Job '{}' firing pipeline {}", job.name, job.pipeline_id);

        match run_service::run_pipeline(&pool, job.pipeline_id, RunOptions::default()).await {
            Ok(outcome) => {
                let failed = outcome.steps.iter().filter(|s| !s.success).count();
                if failed > 0 {
                    tracing::warn!(
                        "Job '{}' completed with {} failed step(s)",
                        job.name,
                        failed
                    );
                } else {
                    tracing::info!("Job '{}' completed successfully", job.name);
                }
            }
            Err(e) => {
                tracing::error!("Job '{}' failed to run: {:?}", job.name, e);
            }
        }

        if let Err(e) = schedule_repository::record_run(&pool, job.id, fired_at).await {
            tracing::error!("Failed to record run time for job '{}': {}", job.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cron_accepts_five_fields() {
        let schedule = parse_cron("*/5 * * * *").unwrap();
        assert!(schedule.upcoming(Utc).next().is_some());
    }

    #[test]
    fn test_parse_cron_accepts_six_fields() {
        assert!(parse_cron("0 0 3 * * *").is_ok());
    }

    #[test]
    fn test_parse_cron_rejects_garbage() {
        assert!(parse_cron("every day at noon").is_err());
        assert!(parse_cron("* *").is_err());
    }
}
