//! Host domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A remote execution target reachable over SSH
///
/// Structure shared between the server (persists) and the engine (connects).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub os_type: String,
    /// Distro tag, only meaningful when the OS is Linux
    pub distro: Option<String>,
    pub ssh_user: String,
    /// Path to an explicit private key file; falls back to the SSH agent
    pub ssh_key_path: Option<String>,
    /// Stored password; used only when no key path is set
    pub password: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub group_id: Option<Uuid>,
}

impl Host {
    /// Address to connect to, falling back to the host name when no
    /// explicit address was stored.
    pub fn connect_address(&self) -> &str {
        if self.address.is_empty() {
            &self.name
        } else {
            &self.address
        }
    }
}

/// Named grouping of hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostGroup {
    pub id: Uuid,
    pub name: String,
}

/// Supported Linux distributions offered in the host form
pub const DISTROS: &[&str] = &[
    "Ubuntu",
    "Debian",
    "CentOS",
    "RHEL",
    "Fedora",
    "SUSE",
    "OpenSUSE",
    "Alpine",
    "Arch",
    "Manjaro",
    "Mint",
    "Pop!_OS",
    "Kali",
    "Rocky Linux",
    "AlmaLinux",
    "Amazon Linux",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_address_prefers_explicit_address() {
        let host = Host {
            id: Uuid::new_v4(),
            name: "web1".to_string(),
            address: "10.0.0.5".to_string(),
            os_type: "Linux".to_string(),
            distro: Some("Ubuntu".to_string()),
            ssh_user: "ops".to_string(),
            ssh_key_path: None,
            password: None,
            location: None,
            description: None,
            group_id: None,
        };
        assert_eq!(host.connect_address(), "10.0.0.5");
    }

    #[test]
    fn test_connect_address_falls_back_to_name() {
        let host = Host {
            id: Uuid::new_v4(),
            name: "web1.internal".to_string(),
            address: String::new(),
            os_type: "Linux".to_string(),
            distro: None,
            ssh_user: "ops".to_string(),
            ssh_key_path: None,
            password: None,
            location: None,
            description: None,
            group_id: None,
        };
        assert_eq!(host.connect_address(), "web1.internal");
    }
}
