//! Schedule domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted cron-triggered binding of a pipeline to a recurrence rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: Uuid,
    pub name: String,
    pub pipeline_id: Uuid,
    /// Standard five-field cron expression
    pub cron_expr: String,
    pub enabled: bool,
    pub last_run: Option<chrono::DateTime<chrono::Utc>>,
}
