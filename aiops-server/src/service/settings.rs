//! Settings Service
//!
//! Business logic for the key/value settings store. Secret values are
//! masked on read so the settings page never echoes stored credentials.

use aiops_core::domain::settings::SettingsMap;
use sqlx::PgPool;

/// Service error type
#[derive(Debug)]
pub enum SettingsError {
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for SettingsError {
    fn from(err: sqlx::Error) -> Self {
        SettingsError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Placeholder returned for stored secret values
pub const MASKED: &str = "********";

/// Setting keys whose values are never echoed back
const SECRET_KEYS: &[&str] = &[
    "openai_api_key",
    "gemini_api_key",
    "smtp_password",
    "github_token",
];

/// Load all settings with secret values masked
pub async fn get_settings(pool: &PgPool) -> Result<SettingsMap> {
    let mut settings = crate::repository::settings_repository::load_all(pool).await?;

    for (key, value) in settings.iter_mut() {
        if SECRET_KEYS.contains(&key.as_str()) && !value.is_empty() {
            *value = MASKED.to_string();
        }
    }

    Ok(settings)
}

/// Apply a batch of settings
///
/// A masked placeholder submitted back for a secret key means "keep the
/// stored value" and is dropped from the batch.
pub async fn update_settings(pool: &PgPool, mut entries: SettingsMap) -> Result<()> {
    entries.retain(|key, value| !(SECRET_KEYS.contains(&key.as_str()) && value == MASKED));

    for key in entries.keys() {
        if key.trim().is_empty() {
            return Err(SettingsError::ValidationError(
                "Setting keys cannot be empty".to_string(),
            ));
        }
    }

    if entries.is_empty() {
        return Ok(());
    }

    let count = entries.len();
    crate::repository::settings_repository::set_many(pool, &entries).await?;

    tracing::info!("Updated {} setting(s)", count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_keys_cover_credentials() {
        assert!(SECRET_KEYS.contains(&"smtp_password"));
        assert!(SECRET_KEYS.contains(&"github_token"));
    }
}
