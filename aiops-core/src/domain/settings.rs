//! Application settings
//!
//! Settings persist as key/value rows and are read into a typed view by the
//! components that need them (SMTP sender, notifiers, AI client, GitHub
//! export).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw key/value settings as stored
pub type SettingsMap = BTreeMap<String, String>;

/// SMTP configuration assembled from settings rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub use_tls: bool,
}

impl SmtpSettings {
    /// Builds SMTP settings from the raw map, returning `None` unless every
    /// required field is present. Incomplete settings fail closed at the
    /// send site with a descriptive error.
    pub fn from_map(map: &SettingsMap) -> Option<Self> {
        let server = non_empty(map.get("smtp_server"))?;
        let port = map.get("smtp_port")?.parse().ok()?;
        let username = non_empty(map.get("smtp_username"))?;
        let password = non_empty(map.get("smtp_password"))?;
        let sender = non_empty(map.get("smtp_sender_email"))?;
        let use_tls = map.get("smtp_use_tls").map(|v| v == "true").unwrap_or(false);
        Some(Self {
            server,
            port,
            username,
            password,
            sender,
            use_tls,
        })
    }
}

/// Well-known setting keys
pub mod keys {
    pub const OPENAI_API_KEY: &str = "openai_api_key";
    pub const GEMINI_API_KEY: &str = "gemini_api_key";
    pub const CHAT_WEBHOOK_URL: &str = "chat_webhook_url";
    pub const NOTIFY_EMAIL_RECIPIENT: &str = "notify_email_recipient";
    pub const GITHUB_REPO: &str = "github_repo";
    pub const GITHUB_TOKEN: &str = "github_token";
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> SettingsMap {
        [
            ("smtp_server", "mail.example.com"),
            ("smtp_port", "587"),
            ("smtp_username", "ops"),
            ("smtp_password", "hunter2"),
            ("smtp_sender_email", "aiops@example.com"),
            ("smtp_use_tls", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_smtp_settings_complete() {
        let smtp = SmtpSettings::from_map(&full_map()).unwrap();
        assert_eq!(smtp.server, "mail.example.com");
        assert_eq!(smtp.port, 587);
        assert!(smtp.use_tls);
    }

    #[test]
    fn test_smtp_settings_incomplete_fails_closed() {
        let mut map = full_map();
        map.remove("smtp_password");
        assert!(SmtpSettings::from_map(&map).is_none());

        let mut map = full_map();
        map.insert("smtp_server".to_string(), "  ".to_string());
        assert!(SmtpSettings::from_map(&map).is_none());
    }

    #[test]
    fn test_smtp_tls_defaults_off() {
        let mut map = full_map();
        map.remove("smtp_use_tls");
        let smtp = SmtpSettings::from_map(&map).unwrap();
        assert!(!smtp.use_tls);
    }
}
