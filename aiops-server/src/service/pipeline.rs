//! Pipeline Service
//!
//! Business logic for pipeline management: saving graphs, YAML rendering,
//! and pushing rendered definitions to GitHub.

use aiops_core::domain::pipeline::Pipeline;
use aiops_core::domain::settings::keys;
use aiops_core::dto::pipeline::{PipelineSummary, PipelineYaml, PushPipeline, SavePipeline};
use sqlx::PgPool;
use uuid::Uuid;

use crate::github;
use crate::repository::{pipeline_repository, settings_repository};

/// Service error type
#[derive(Debug)]
pub enum PipelineError {
    NotFound(Uuid),
    ValidationError(String),
    NotConfigured(String),
    ExportError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Save a pipeline (create or update-by-name)
pub async fn save_pipeline(pool: &PgPool, req: SavePipeline) -> Result<Pipeline> {
    validate_pipeline_request(&req)?;

    let pipeline = pipeline_repository::save(pool, req).await?;

    tracing::info!("Pipeline saved: {} ({})", pipeline.name, pipeline.id);

    Ok(pipeline)
}

/// Get a pipeline by ID
pub async fn get_pipeline(pool: &PgPool, id: Uuid) -> Result<Pipeline> {
    pipeline_repository::find_by_id(pool, id)
        .await?
        .ok_or(PipelineError::NotFound(id))
}

/// List all pipelines
pub async fn list_pipelines(pool: &PgPool) -> Result<Vec<PipelineSummary>> {
    Ok(pipeline_repository::list_all(pool).await?)
}

/// Delete a pipeline
pub async fn delete_pipeline(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = pipeline_repository::delete(pool, id).await?;

    if !deleted {
        return Err(PipelineError::NotFound(id));
    }

    tracing::info!("Pipeline deleted: {}", id);

    Ok(())
}

/// Render a pipeline's definition as YAML
pub async fn render_yaml(pool: &PgPool, id: Uuid) -> Result<PipelineYaml> {
    let pipeline = get_pipeline(pool, id).await?;
    let yaml = serde_yaml::to_string(&pipeline.definition)
        .map_err(|e| PipelineError::ExportError(e.to_string()))?;

    Ok(PipelineYaml {
        name: pipeline.name,
        yaml,
    })
}

/// Push a pipeline's YAML rendering to the configured GitHub repository
pub async fn push_to_github(pool: &PgPool, id: Uuid, req: PushPipeline) -> Result<String> {
    if req.file_path.trim().is_empty() {
        return Err(PipelineError::ValidationError(
            "File path cannot be empty".to_string(),
        ));
    }

    let rendered = render_yaml(pool, id).await?;

    let repo = settings_repository::get(pool, keys::GITHUB_REPO)
        .await?
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            PipelineError::NotConfigured("GitHub repository is not configured".to_string())
        })?;
    let token = settings_repository::get(pool, keys::GITHUB_TOKEN)
        .await?
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            PipelineError::NotConfigured("GitHub token is not configured".to_string())
        })?;

    let commit = github::push_file(
        &repo,
        &token,
        &req.file_path,
        &rendered.yaml,
        &req.commit_message,
    )
    .await
    .map_err(|e| PipelineError::ExportError(e.to_string()))?;

    tracing::info!(
        "Pipeline '{}' pushed to {}:{} ({})",
        rendered.name,
        repo,
        req.file_path,
        commit
    );

    Ok(commit)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_pipeline_request(req: &SavePipeline) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(PipelineError::ValidationError(
            "Pipeline name cannot be empty".to_string(),
        ));
    }

    if req.name.len() > 100 {
        return Err(PipelineError::ValidationError(
            "Pipeline name is too long (max 100 characters)".to_string(),
        ));
    }

    // Reject graphs the engine could never run. This catches dangling
    // connection endpoints and cycles at save time.
    if let Err(e) = aiops_engine::graph::execution_order(&req.definition) {
        return Err(PipelineError::ValidationError(e.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiops_core::domain::pipeline::{Connection, Node, NodeKind, NodeMap, PipelineDefinition};

    fn request(definition: PipelineDefinition) -> SavePipeline {
        SavePipeline {
            name: "triage".to_string(),
            description: None,
            definition,
        }
    }

    #[test]
    fn test_validation_rejects_dangling_connection() {
        let mut nodes = NodeMap::new();
        nodes.insert(
            "s1".to_string(),
            Node {
                name: "Check".to_string(),
                kind: NodeKind::Script {
                    content: "uptime".to_string(),
                },
            },
        );
        let definition = PipelineDefinition {
            nodes,
            connections: vec![Connection {
                from: "s1".to_string(),
                to: "ghost".to_string(),
            }],
        };
        assert!(matches!(
            validate_pipeline_request(&request(definition)),
            Err(PipelineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_accepts_empty_graph() {
        assert!(validate_pipeline_request(&request(PipelineDefinition::default())).is_ok());
    }
}
