//! User and permission domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An operator account
///
/// The password hash and API key are stored salted/digested; the raw values
/// never appear in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Present once an API key has been issued for this user
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    pub group_id: Option<Uuid>,
}

/// A named permission group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGroup {
    pub id: Uuid,
    pub name: String,
    pub permissions: PermissionSet,
}

/// Per-feature access levels for a group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(default)]
    pub hosts: AccessLevel,
    #[serde(default)]
    pub scripts: AccessLevel,
    #[serde(default)]
    pub pipelines: AccessLevel,
    #[serde(default)]
    pub users: AccessLevel,
    #[serde(default)]
    pub settings: AccessLevel,
    #[serde(default)]
    pub groups: AccessLevel,
}

impl PermissionSet {
    /// Full access to every feature (the Admin group)
    pub fn full() -> Self {
        Self {
            hosts: AccessLevel::Full,
            scripts: AccessLevel::Full,
            pipelines: AccessLevel::Full,
            users: AccessLevel::Full,
            settings: AccessLevel::Full,
            groups: AccessLevel::Full,
        }
    }

    /// Default Engineer permissions: full operational access, no admin
    pub fn engineer() -> Self {
        Self {
            hosts: AccessLevel::Full,
            scripts: AccessLevel::Full,
            pipelines: AccessLevel::Full,
            ..Default::default()
        }
    }

    /// Default Viewer permissions: read-only operational access
    pub fn viewer() -> Self {
        Self {
            hosts: AccessLevel::View,
            scripts: AccessLevel::View,
            pipelines: AccessLevel::View,
            ..Default::default()
        }
    }
}

/// Access level for one feature area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    None,
    View,
    Full,
}

impl AccessLevel {
    pub fn can_view(self) -> bool {
        self >= AccessLevel::View
    }

    pub fn can_edit(self) -> bool {
        self == AccessLevel::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::Full.can_view());
        assert!(AccessLevel::View.can_view());
        assert!(!AccessLevel::None.can_view());
        assert!(AccessLevel::Full.can_edit());
        assert!(!AccessLevel::View.can_edit());
    }

    #[test]
    fn test_permission_set_presets() {
        let admin = PermissionSet::full();
        assert!(admin.users.can_edit());

        let viewer = PermissionSet::viewer();
        assert!(viewer.hosts.can_view());
        assert!(!viewer.hosts.can_edit());
        assert!(!viewer.settings.can_view());
    }

    #[test]
    fn test_user_hides_secrets_when_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "salt$digest".to_string(),
            api_key: Some("secret".to_string()),
            group_id: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("salt$digest"));
        assert!(!json.contains("secret"));
    }
}
