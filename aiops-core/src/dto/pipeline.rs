//! Pipeline DTOs

use crate::domain::pipeline::PipelineDefinition;
use crate::domain::run::{RunOptions, StepResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to save a pipeline
///
/// Saving under an existing name updates that pipeline in place; a new name
/// creates a new pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePipeline {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub definition: PipelineDefinition,
}

/// Compact listing row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Request body for a manual pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunPipeline {
    #[serde(default, flatten)]
    pub options: RunOptions,
}

/// Ordered outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub pipeline_id: Uuid,
    pub pipeline_name: String,
    pub steps: Vec<StepResult>,
}

/// Response for the YAML rendering endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineYaml {
    pub name: String,
    pub yaml: String,
}

/// Request to push a pipeline's YAML rendering to GitHub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPipeline {
    /// Path within the repository, e.g. "pipelines/triage.yaml"
    pub file_path: String,
    pub commit_message: String,
}
