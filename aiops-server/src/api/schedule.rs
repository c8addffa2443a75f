//! Schedule API Handlers
//!
//! HTTP endpoints for scheduled jobs. Mutations keep the background
//! scheduler in sync with the database: creating or resuming a job arms
//! its task, pausing or deleting disarms it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use aiops_core::domain::run::RunOptions;
use aiops_core::domain::schedule::ScheduledJob;
use aiops_core::dto::pipeline::RunOutcome;
use aiops_core::dto::schedule::SaveSchedule;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::{run_service, schedule_service};

impl From<schedule_service::ScheduleError> for ApiError {
    fn from(err: schedule_service::ScheduleError) -> Self {
        match err {
            schedule_service::ScheduleError::NotFound(id) => {
                ApiError::NotFound(format!("Schedule {} not found", id))
            }
            schedule_service::ScheduleError::PipelineNotFound(id) => {
                ApiError::NotFound(format!("Pipeline {} not found", id))
            }
            schedule_service::ScheduleError::ValidationError(msg) => ApiError::BadRequest(msg),
            schedule_service::ScheduleError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// POST /schedule/create
/// Create a scheduled job and arm it
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<SaveSchedule>,
) -> ApiResult<(StatusCode, Json<ScheduledJob>)> {
    tracing::info!("Creating schedule: {}", req.name);

    let job = schedule_service::create_schedule(&state.pool, req).await?;
    state.scheduler.arm(job.clone());

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /schedule/list
/// List all scheduled jobs
pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<Json<Vec<ScheduledJob>>> {
    let jobs = schedule_service::list_schedules(&state.pool).await?;

    Ok(Json(jobs))
}

/// GET /schedule/{id}
/// Get a scheduled job by ID
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ScheduledJob>> {
    let job = schedule_service::get_schedule(&state.pool, id).await?;

    Ok(Json(job))
}

/// PUT /schedule/{id}
/// Update a scheduled job and re-arm it when enabled
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveSchedule>,
) -> ApiResult<Json<ScheduledJob>> {
    tracing::info!("Updating schedule: {}", id);

    let job = schedule_service::update_schedule(&state.pool, id, req).await?;

    state.scheduler.disarm(id);
    if job.enabled {
        state.scheduler.arm(job.clone());
    }

    Ok(Json(job))
}

/// DELETE /schedule/{id}
/// Delete a scheduled job and disarm it
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting schedule: {}", id);

    schedule_service::delete_schedule(&state.pool, id).await?;
    state.scheduler.disarm(id);

    Ok(StatusCode::NO_CONTENT)
}

/// POST /schedule/{id}/pause
/// Disable a scheduled job and disarm its task
pub async fn pause_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ScheduledJob>> {
    tracing::info!("Pausing schedule: {}", id);

    let job = schedule_service::set_enabled(&state.pool, id, false).await?;
    state.scheduler.disarm(id);

    Ok(Json(job))
}

/// POST /schedule/{id}/resume
/// Re-enable a scheduled job and arm its task
pub async fn resume_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ScheduledJob>> {
    tracing::info!("Resuming schedule: {}", id);

    let job = schedule_service::set_enabled(&state.pool, id, true).await?;
    state.scheduler.arm(job.clone());

    Ok(Json(job))
}

/// POST /schedule/{id}/run
/// Fire a scheduled job's pipeline immediately
pub async fn run_schedule_now(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RunOutcome>> {
    tracing::info!("Immediate run requested for schedule: {}", id);

    let job = schedule_service::get_schedule(&state.pool, id).await?;
    let outcome =
        run_service::run_pipeline(&state.pool, job.pipeline_id, RunOptions::default()).await?;

    Ok(Json(outcome))
}
