//! Script domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored script body with its type tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub script_type: ScriptType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Script language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Bash,
    Python,
    Ansible,
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptType::Bash => write!(f, "bash"),
            ScriptType::Python => write!(f, "python"),
            ScriptType::Ansible => write!(f, "ansible"),
        }
    }
}

impl std::str::FromStr for ScriptType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(ScriptType::Bash),
            "python" => Ok(ScriptType::Python),
            "ansible" => Ok(ScriptType::Ansible),
            other => Err(format!("unknown script type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_type_round_trip() {
        for t in [ScriptType::Bash, ScriptType::Python, ScriptType::Ansible] {
            let parsed: ScriptType = t.to_string().parse().unwrap();
            assert_eq!(parsed, t);
        }
    }

    #[test]
    fn test_script_type_rejects_unknown() {
        assert!("perl".parse::<ScriptType>().is_err());
    }
}
