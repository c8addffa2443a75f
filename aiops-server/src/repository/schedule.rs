//! Schedule Repository
//!
//! Handles all database operations related to scheduled jobs.

use aiops_core::domain::schedule::ScheduledJob;
use aiops_core::dto::schedule::SaveSchedule;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new scheduled job (enabled by default)
pub async fn create(pool: &PgPool, req: SaveSchedule) -> Result<ScheduledJob, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO scheduled_jobs (id, name, pipeline_id, cron_expr, enabled, last_run)
        VALUES ($1, $2, $3, $4, TRUE, NULL)
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.pipeline_id)
    .bind(&req.cron_expr)
    .execute(pool)
    .await?;

    Ok(ScheduledJob {
        id,
        name: req.name,
        pipeline_id: req.pipeline_id,
        cron_expr: req.cron_expr,
        enabled: true,
        last_run: None,
    })
}

/// Find a scheduled job by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ScheduledJob>, sqlx::Error> {
    let row = sqlx::query_as::<_, ScheduledJobRow>(
        r#"
        SELECT id, name, pipeline_id, cron_expr, enabled, last_run
        FROM scheduled_jobs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all scheduled jobs
pub async fn list_all(pool: &PgPool) -> Result<Vec<ScheduledJob>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ScheduledJobRow>(
        r#"
        SELECT id, name, pipeline_id, cron_expr, enabled, last_run
        FROM scheduled_jobs
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// List jobs that should be armed at startup
pub async fn list_enabled(pool: &PgPool) -> Result<Vec<ScheduledJob>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ScheduledJobRow>(
        r#"
        SELECT id, name, pipeline_id, cron_expr, enabled, last_run
        FROM scheduled_jobs
        WHERE enabled = TRUE
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Update a job's name, pipeline binding, and cron expression
pub async fn update(pool: &PgPool, id: Uuid, req: SaveSchedule) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE scheduled_jobs
        SET name = $1, pipeline_id = $2, cron_expr = $3
        WHERE id = $4
        "#,
    )
    .bind(&req.name)
    .bind(req.pipeline_id)
    .bind(&req.cron_expr)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Flip a job's enabled flag
pub async fn set_enabled(pool: &PgPool, id: Uuid, enabled: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE scheduled_jobs SET enabled = $1 WHERE id = $2")
        .bind(enabled)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Record the time a job last fired
pub async fn record_run(
    pool: &PgPool,
    id: Uuid,
    at: chrono::DateTime<chrono::Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE scheduled_jobs SET last_run = $1 WHERE id = $2")
        .bind(at)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a scheduled job by ID
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM scheduled_jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ScheduledJobRow {
    id: Uuid,
    name: String,
    pipeline_id: Uuid,
    cron_expr: String,
    enabled: bool,
    last_run: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<ScheduledJobRow> for ScheduledJob {
    fn from(row: ScheduledJobRow) -> Self {
        ScheduledJob {
            id: row.id,
            name: row.name,
            pipeline_id: row.pipeline_id,
            cron_expr: row.cron_expr,
            enabled: row.enabled,
            last_run: row.last_run,
        }
    }
}
