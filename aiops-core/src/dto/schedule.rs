//! Schedule DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or update a scheduled job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSchedule {
    pub name: String,
    pub pipeline_id: Uuid,
    pub cron_expr: String,
}
