//! Schedule Service
//!
//! Business logic for scheduled jobs. Persistence lives here; arming and
//! disarming the background tasks is the scheduler's job and is driven by
//! the API layer, which holds the scheduler handle.

use aiops_core::domain::schedule::ScheduledJob;
use aiops_core::dto::schedule::SaveSchedule;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{pipeline_repository, schedule_repository};
use crate::scheduler;

/// Service error type
#[derive(Debug)]
pub enum ScheduleError {
    NotFound(Uuid),
    PipelineNotFound(Uuid),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ScheduleError {
    fn from(err: sqlx::Error) -> Self {
        ScheduleError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Create a scheduled job
pub async fn create_schedule(pool: &PgPool, req: SaveSchedule) -> Result<ScheduledJob> {
    validate_schedule_request(&req)?;

    if pipeline_repository::find_by_id(pool, req.pipeline_id)
        .await?
        .is_none()
    {
        return Err(ScheduleError::PipelineNotFound(req.pipeline_id));
    }

    let job = schedule_repository::create(pool, req).await?;

    tracing::info!(
        "Schedule created: '{}' ({}) -> pipeline {}",
        job.name,
        job.cron_expr,
        job.pipeline_id
    );

    Ok(job)
}

/// Get a scheduled job by ID
pub async fn get_schedule(pool: &PgPool, id: Uuid) -> Result<ScheduledJob> {
    schedule_repository::find_by_id(pool, id)
        .await?
        .ok_or(ScheduleError::NotFound(id))
}

/// List all scheduled jobs
pub async fn list_schedules(pool: &PgPool) -> Result<Vec<ScheduledJob>> {
    Ok(schedule_repository::list_all(pool).await?)
}

/// Update a scheduled job and return the new state
pub async fn update_schedule(pool: &PgPool, id: Uuid, req: SaveSchedule) -> Result<ScheduledJob> {
    validate_schedule_request(&req)?;

    if pipeline_repository::find_by_id(pool, req.pipeline_id)
        .await?
        .is_none()
    {
        return Err(ScheduleError::PipelineNotFound(req.pipeline_id));
    }

    let updated = schedule_repository::update(pool, id, req).await?;

    if !updated {
        return Err(ScheduleError::NotFound(id));
    }

    get_schedule(pool, id).await
}

/// Flip a job's enabled flag and return the updated job
pub async fn set_enabled(pool: &PgPool, id: Uuid, enabled: bool) -> Result<ScheduledJob> {
    let updated = schedule_repository::set_enabled(pool, id, enabled).await?;

    if !updated {
        return Err(ScheduleError::NotFound(id));
    }

    get_schedule(pool, id).await
}

/// Delete a scheduled job
pub async fn delete_schedule(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = schedule_repository::delete(pool, id).await?;

    if !deleted {
        return Err(ScheduleError::NotFound(id));
    }

    tracing::info!("Schedule deleted: {}", id);

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_schedule_request(req: &SaveSchedule) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(ScheduleError::ValidationError(
            "Schedule name cannot be empty".to_string(),
        ));
    }

    if let Err(e) = scheduler::parse_cron(&req.cron_expr) {
        return Err(ScheduleError::ValidationError(format!(
            "Invalid cron expression '{}': {}",
            req.cron_expr, e
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_bad_cron() {
        let req = SaveSchedule {
            name: "nightly".to_string(),
            pipeline_id: Uuid::new_v4(),
            cron_expr: "whenever".to_string(),
        };
        assert!(matches!(
            validate_schedule_request(&req),
            Err(ScheduleError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_accepts_five_field_cron() {
        let req = SaveSchedule {
            name: "nightly".to_string(),
            pipeline_id: Uuid::new_v4(),
            cron_expr: "0 3 * * *".to_string(),
        };
        assert!(validate_schedule_request(&req).is_ok());
    }
}
