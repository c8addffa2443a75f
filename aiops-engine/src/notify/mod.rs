//! Notification dispatcher
//!
//! Posts formatted run reports to a chat webhook (chunked when oversized)
//! or sends them as email via SMTP. Both paths fail closed with a
//! descriptive error when their settings are incomplete; the engine records
//! that error on the step instead of aborting the run.

pub mod chat;
pub mod email;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::executor::Notifier;
pub use chat::ChatNotifier;
pub use email::EmailNotifier;

/// Production notifier combining the chat and email paths
pub struct NotificationDispatcher {
    chat: ChatNotifier,
    email: EmailNotifier,
}

impl NotificationDispatcher {
    pub fn new(chat: ChatNotifier, email: EmailNotifier) -> Self {
        Self { chat, email }
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    async fn send_chat(&self, message: &str) -> Result<String, NotifyError> {
        self.chat.send(message).await
    }

    async fn send_email(&self, subject: &str, html_body: &str) -> Result<String, NotifyError> {
        self.email.send(subject, html_body).await
    }
}
