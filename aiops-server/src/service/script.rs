//! Script Service
//!
//! Business logic for the script store.

use aiops_core::domain::script::Script;
use aiops_core::dto::script::{SaveScript, ScriptSummary};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::repository::script_repository;

/// Service error type
#[derive(Debug)]
pub enum ScriptError {
    NotFound(Uuid),
    DuplicateName(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ScriptError {
    fn from(err: sqlx::Error) -> Self {
        ScriptError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;

/// Create a new script
pub async fn create_script(pool: &PgPool, req: SaveScript) -> Result<Script> {
    validate_script_request(&req)?;

    let script = script_repository::create(pool, req).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            ScriptError::DuplicateName("A script with this name already exists".to_string())
        } else {
            ScriptError::DatabaseError(e)
        }
    })?;

    tracing::info!("Script created: {} ({})", script.name, script.id);

    Ok(script)
}

/// Get a script by ID
pub async fn get_script(pool: &PgPool, id: Uuid) -> Result<Script> {
    script_repository::find_by_id(pool, id)
        .await?
        .ok_or(ScriptError::NotFound(id))
}

/// List all scripts
pub async fn list_scripts(pool: &PgPool) -> Result<Vec<ScriptSummary>> {
    Ok(script_repository::list_all(pool).await?)
}

/// Update a script
pub async fn update_script(pool: &PgPool, id: Uuid, req: SaveScript) -> Result<Script> {
    validate_script_request(&req)?;

    let updated = script_repository::update(pool, id, req).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            ScriptError::DuplicateName("A script with this name already exists".to_string())
        } else {
            ScriptError::DatabaseError(e)
        }
    })?;

    if !updated {
        return Err(ScriptError::NotFound(id));
    }

    get_script(pool, id).await
}

/// Delete a script
pub async fn delete_script(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = script_repository::delete(pool, id).await?;

    if !deleted {
        return Err(ScriptError::NotFound(id));
    }

    tracing::info!("Script deleted: {}", id);

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_script_request(req: &SaveScript) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(ScriptError::ValidationError(
            "Script name cannot be empty".to_string(),
        ));
    }

    if req.content.trim().is_empty() {
        return Err(ScriptError::ValidationError(
            "Script content cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiops_core::domain::script::ScriptType;

    #[test]
    fn test_validation_rejects_empty_content() {
        let req = SaveScript {
            name: "check".to_string(),
            content: "\n\t ".to_string(),
            script_type: ScriptType::Bash,
        };
        assert!(matches!(
            validate_script_request(&req),
            Err(ScriptError::ValidationError(_))
        ));
    }
}
