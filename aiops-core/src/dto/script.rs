//! Script DTOs

use crate::domain::script::ScriptType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or update a script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScript {
    pub name: String,
    pub content: String,
    pub script_type: ScriptType,
}

/// Compact listing row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSummary {
    pub id: Uuid,
    pub name: String,
    pub script_type: ScriptType,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
