//! Inbound webhook DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alert payload posted by a monitoring system (Zabbix-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAlert {
    pub hostname: String,
    pub pipeline_id: Uuid,
    #[serde(default = "default_trigger_name")]
    pub trigger_name: String,
}

fn default_trigger_name() -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_name_defaults() {
        let raw = format!(
            r#"{{"hostname": "web1", "pipeline_id": "{}"}}"#,
            Uuid::new_v4()
        );
        let alert: WebhookAlert = serde_json::from_str(&raw).unwrap();
        assert_eq!(alert.trigger_name, "N/A");
    }
}
