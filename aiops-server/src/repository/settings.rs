//! Settings Repository
//!
//! The settings table is a flat key/value store. Writes upsert per key.

use aiops_core::domain::settings::SettingsMap;
use sqlx::PgPool;

/// Load every setting into a map
pub async fn load_all(pool: &PgPool) -> Result<SettingsMap, sqlx::Error> {
    let rows = sqlx::query_as::<_, SettingRow>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
}

/// Fetch a single setting
pub async fn get(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query_as::<_, SettingRow>("SELECT key, value FROM settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.value))
}

/// Insert or replace a single setting
pub async fn set(pool: &PgPool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply a batch of settings in one transaction
pub async fn set_many(pool: &PgPool, entries: &SettingsMap) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for (key, value) in entries {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Remove a setting
pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM settings WHERE key = $1")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct SettingRow {
    key: String,
    value: String,
}
