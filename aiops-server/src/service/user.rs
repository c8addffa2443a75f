//! User Service
//!
//! Business logic for users, access groups, and API keys. Passwords are
//! stored as `salt$digest` using SHA-256; API keys are stored as a bare
//! digest so a database leak does not leak usable keys. The raw key is
//! returned exactly once, at issue time.

use aiops_core::domain::user::{AccessGroup, PermissionSet, User};
use aiops_core::dto::user::{CreateGroup, CreateUser, IssuedApiKey};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::repository::user_repository;

/// Service error type
#[derive(Debug)]
pub enum UserError {
    NotFound(Uuid),
    DuplicateName(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, UserError>;

/// Create a new user
pub async fn create_user(pool: &PgPool, req: CreateUser) -> Result<User> {
    validate_user_request(&req)?;

    let password_hash = hash_password(&req.password);
    let user = user_repository::create(
        pool,
        &req.username,
        &req.email,
        &password_hash,
        req.group_id,
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            UserError::DuplicateName("A user with this username already exists".to_string())
        } else {
            UserError::DatabaseError(e)
        }
    })?;

    tracing::info!("User created: {} ({})", user.username, user.id);

    Ok(user)
}

/// Get a user by ID
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<User> {
    user_repository::find_by_id(pool, id)
        .await?
        .ok_or(UserError::NotFound(id))
}

/// List all users
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    Ok(user_repository::list_all(pool).await?)
}

/// Delete a user
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = user_repository::delete(pool, id).await?;

    if !deleted {
        return Err(UserError::NotFound(id));
    }

    tracing::info!("User deleted: {}", id);

    Ok(())
}

/// Issue a fresh API key for a user, replacing any previous key
pub async fn issue_api_key(pool: &PgPool, id: Uuid) -> Result<IssuedApiKey> {
    let raw_key = format!(
        "aik_{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );

    let stored = user_repository::set_api_key(pool, id, &digest(&raw_key)).await?;
    if !stored {
        return Err(UserError::NotFound(id));
    }

    tracing::info!("API key issued for user {}", id);

    Ok(IssuedApiKey {
        user_id: id,
        api_key: raw_key,
    })
}

/// Resolve a raw API key from a request header to its user
pub async fn authenticate_api_key(pool: &PgPool, raw_key: &str) -> Result<Option<User>> {
    Ok(user_repository::find_by_api_key(pool, &digest(raw_key)).await?)
}

/// Verify a username/password pair
pub async fn verify_password(pool: &PgPool, username: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = user_repository::find_by_username(pool, username).await? else {
        return Ok(None);
    };

    if password_matches(password, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Create an access group
pub async fn create_group(pool: &PgPool, req: CreateGroup) -> Result<AccessGroup> {
    if req.name.trim().is_empty() {
        return Err(UserError::ValidationError(
            "Group name cannot be empty".to_string(),
        ));
    }

    user_repository::create_group(pool, &req.name, &req.permissions)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                UserError::DuplicateName("A group with this name already exists".to_string())
            } else {
                UserError::DatabaseError(e)
            }
        })
}

/// List all access groups
pub async fn list_groups(pool: &PgPool) -> Result<Vec<AccessGroup>> {
    Ok(user_repository::list_groups(pool).await?)
}

/// Delete an access group
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<()> {
    let deleted = user_repository::delete_group(pool, id).await?;

    if !deleted {
        return Err(UserError::NotFound(id));
    }

    Ok(())
}

/// Create the Admin/Engineer/Viewer groups if they do not exist yet
pub async fn create_default_groups(pool: &PgPool) -> Result<Vec<AccessGroup>> {
    let presets = [
        ("Admin", PermissionSet::full()),
        ("Engineer", PermissionSet::engineer()),
        ("Viewer", PermissionSet::viewer()),
    ];

    let mut groups = Vec::new();
    for (name, permissions) in presets {
        let group = match user_repository::find_group_by_name(pool, name).await? {
            Some(existing) => existing,
            None => {
                tracing::info!("Creating default access group '{}'", name);
                user_repository::create_group(pool, name, &permissions).await?
            }
        };
        groups.push(group);
    }

    Ok(groups)
}

/// Resolve a user's permissions, defaulting to no access without a group
pub async fn permissions_for(pool: &PgPool, user: &User) -> Result<PermissionSet> {
    let Some(group_id) = user.group_id else {
        return Ok(PermissionSet::default());
    };

    Ok(user_repository::find_group_by_id(pool, group_id)
        .await?
        .map(|g| g.permissions)
        .unwrap_or_default())
}

// =============================================================================
// Hashing
// =============================================================================

fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, salted_digest(&salt, password))
}

fn password_matches(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => salted_digest(salt, password) == expected,
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

// =============================================================================
// Validation
// =============================================================================

fn validate_user_request(req: &CreateUser) -> Result<()> {
    if req.username.trim().is_empty() {
        return Err(UserError::ValidationError(
            "Username cannot be empty".to_string(),
        ));
    }

    if !req.email.contains('@') {
        return Err(UserError::ValidationError(
            "Email address is not valid".to_string(),
        ));
    }

    if req.password.len() < 8 {
        return Err(UserError::ValidationError(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("hunter2!");
        assert!(password_matches("hunter2!", &stored));
        assert!(!password_matches("hunter3!", &stored));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_password_matches_rejects_malformed_hash() {
        assert!(!password_matches("anything", "no-separator"));
    }

    #[test]
    fn test_validation_rejects_short_password() {
        let req = CreateUser {
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            password: "short".to_string(),
            group_id: None,
        };
        assert!(matches!(
            validate_user_request(&req),
            Err(UserError::ValidationError(_))
        ));
    }
}
