//! Host DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create or update a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHost {
    pub name: String,
    pub address: String,
    pub os_type: String,
    #[serde(default)]
    pub distro: Option<String>,
    pub ssh_user: String,
    #[serde(default)]
    pub ssh_key_path: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group_id: Option<Uuid>,
}

/// Request to create a host group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHostGroup {
    pub name: String,
}

/// Result of an SSH connection probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
}
