//! User Repository
//!
//! Handles all database operations related to users and access groups.
//! Password hashing and API key generation live in the user service; this
//! layer only stores and retrieves the digests.

use aiops_core::domain::user::{AccessGroup, PermissionSet, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new user with a pre-hashed password
pub async fn create(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    group_id: Option<Uuid>,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, api_key, group_id)
        VALUES ($1, $2, $3, $4, NULL, $5)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(group_id)
    .execute(pool)
    .await?;

    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        api_key: None,
        group_id,
    })
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, api_key, group_id
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a user by username
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, api_key, group_id
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a user by their API key
pub async fn find_by_api_key(pool: &PgPool, api_key: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, api_key, group_id
        FROM users
        WHERE api_key = $1
        "#,
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all users
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, api_key, group_id
        FROM users
        ORDER BY username
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Store a freshly issued API key for a user
pub async fn set_api_key(pool: &PgPool, id: Uuid, api_key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET api_key = $1 WHERE id = $2")
        .bind(api_key)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a user by ID
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Create an access group
pub async fn create_group(
    pool: &PgPool,
    name: &str,
    permissions: &PermissionSet,
) -> Result<AccessGroup, sqlx::Error> {
    let id = Uuid::new_v4();
    let permissions_json =
        serde_json::to_value(permissions).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query("INSERT INTO access_groups (id, name, permissions) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(&permissions_json)
        .execute(pool)
        .await?;

    Ok(AccessGroup {
        id,
        name: name.to_string(),
        permissions: permissions.clone(),
    })
}

/// Find an access group by ID
pub async fn find_group_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AccessGroup>, sqlx::Error> {
    let row = sqlx::query_as::<_, AccessGroupRow>(
        "SELECT id, name, permissions FROM access_groups WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(AccessGroup::try_from).transpose()
}

/// Find an access group by name
pub async fn find_group_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<AccessGroup>, sqlx::Error> {
    let row = sqlx::query_as::<_, AccessGroupRow>(
        "SELECT id, name, permissions FROM access_groups WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.map(AccessGroup::try_from).transpose()
}

/// List all access groups
pub async fn list_groups(pool: &PgPool) -> Result<Vec<AccessGroup>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AccessGroupRow>(
        "SELECT id, name, permissions FROM access_groups ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AccessGroup::try_from).collect()
}

/// Delete an access group by ID
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM access_groups WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    api_key: Option<String>,
    group_id: Option<Uuid>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            api_key: row.api_key,
            group_id: row.group_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AccessGroupRow {
    id: Uuid,
    name: String,
    permissions: serde_json::Value,
}

impl TryFrom<AccessGroupRow> for AccessGroup {
    type Error = sqlx::Error;

    fn try_from(row: AccessGroupRow) -> Result<Self, Self::Error> {
        let permissions: PermissionSet = serde_json::from_value(row.permissions)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(AccessGroup {
            id: row.id,
            name: row.name,
            permissions,
        })
    }
}
