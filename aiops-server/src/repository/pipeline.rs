//! Pipeline Repository
//!
//! Handles all database operations related to pipelines. The definition
//! graph is stored as JSONB and decoded into the typed node model on read.

use aiops_core::domain::pipeline::{Pipeline, PipelineDefinition};
use aiops_core::dto::pipeline::{PipelineSummary, SavePipeline};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Save a pipeline by name.
///
/// Saving under an existing name updates that pipeline in place and keeps
/// its id; a new name inserts a fresh row.
pub async fn save(pool: &PgPool, req: SavePipeline) -> Result<Pipeline, sqlx::Error> {
    let definition = serde_json::to_value(&req.definition)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let now = Utc::now();

    if let Some(existing) = find_by_name(pool, &req.name).await? {
        sqlx::query(
            r#"
            UPDATE pipelines
            SET description = $1, definition = $2, updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(&req.description)
        .bind(&definition)
        .bind(now)
        .bind(existing.id)
        .execute(pool)
        .await?;

        return Ok(Pipeline {
            id: existing.id,
            name: req.name,
            description: req.description,
            definition: req.definition,
            created_at: existing.created_at,
            updated_at: now,
        });
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO pipelines (id, name, description, definition, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(&definition)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Pipeline {
        id,
        name: req.name,
        description: req.description,
        definition: req.definition,
        created_at: now,
        updated_at: now,
    })
}

/// Find a pipeline by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Pipeline>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT id, name, description, definition, created_at, updated_at
        FROM pipelines
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Pipeline::try_from).transpose()
}

/// Find a pipeline by its unique name
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Pipeline>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT id, name, description, definition, created_at, updated_at
        FROM pipelines
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.map(Pipeline::try_from).transpose()
}

/// List all pipelines without their definitions
pub async fn list_all(pool: &PgPool) -> Result<Vec<PipelineSummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PipelineSummaryRow>(
        r#"
        SELECT id, name, description, updated_at
        FROM pipelines
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Delete a pipeline by ID
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pipelines WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PipelineRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    definition: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<PipelineRow> for Pipeline {
    type Error = sqlx::Error;

    fn try_from(row: PipelineRow) -> Result<Self, Self::Error> {
        let definition: PipelineDefinition = serde_json::from_value(row.definition)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Pipeline {
            id: row.id,
            name: row.name,
            description: row.description,
            definition,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PipelineSummaryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PipelineSummaryRow> for PipelineSummary {
    fn from(row: PipelineSummaryRow) -> Self {
        PipelineSummary {
            id: row.id,
            name: row.name,
            description: row.description,
            updated_at: row.updated_at,
        }
    }
}
