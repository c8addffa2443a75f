//! Script Repository
//!
//! Handles all database operations related to stored scripts.

use aiops_core::domain::script::{Script, ScriptType};
use aiops_core::dto::script::{SaveScript, ScriptSummary};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new script
pub async fn create(pool: &PgPool, req: SaveScript) -> Result<Script, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO scripts (id, name, content, script_type, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.content)
    .bind(req.script_type.to_string())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Script {
        id,
        name: req.name,
        content: req.content,
        script_type: req.script_type,
        created_at: now,
        updated_at: now,
    })
}

/// Find a script by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Script>, sqlx::Error> {
    let row = sqlx::query_as::<_, ScriptRow>(
        r#"
        SELECT id, name, content, script_type, created_at, updated_at
        FROM scripts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all scripts without their bodies
pub async fn list_all(pool: &PgPool) -> Result<Vec<ScriptSummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ScriptSummaryRow>(
        r#"
        SELECT id, name, script_type, updated_at
        FROM scripts
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Update a script
pub async fn update(pool: &PgPool, id: Uuid, req: SaveScript) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE scripts
        SET name = $1, content = $2, script_type = $3, updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(&req.name)
    .bind(&req.content)
    .bind(req.script_type.to_string())
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a script by ID
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM scripts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ScriptRow {
    id: Uuid,
    name: String,
    content: String,
    script_type: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ScriptRow> for Script {
    fn from(row: ScriptRow) -> Self {
        Script {
            id: row.id,
            name: row.name,
            content: row.content,
            // Stored values are written through Display, so a parse failure
            // can only mean the column was edited out of band.
            script_type: row.script_type.parse().unwrap_or(ScriptType::Bash),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScriptSummaryRow {
    id: Uuid,
    name: String,
    script_type: String,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ScriptSummaryRow> for ScriptSummary {
    fn from(row: ScriptSummaryRow) -> Self {
        ScriptSummary {
            id: row.id,
            name: row.name,
            script_type: row.script_type.parse().unwrap_or(ScriptType::Bash),
            updated_at: row.updated_at,
        }
    }
}
