//! User and group DTOs

use crate::domain::user::PermissionSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub group_id: Option<Uuid>,
}

/// Response carrying a freshly issued API key
///
/// The raw key is only ever returned here, at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedApiKey {
    pub user_id: Uuid,
    pub api_key: String,
}

/// Request to create a permission group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}
