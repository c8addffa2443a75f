//! Engine error types

use thiserror::Error;

/// Errors produced by graph validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Pipeline has a cycle and cannot be run")]
    Cycle,
    #[error("connection references unknown node id '{0}'")]
    UnknownNode(String),
}

/// Errors produced by the SSH command runner
#[derive(Debug, Error)]
pub enum SshError {
    #[error("connection to {address} failed: {message}")]
    Connection { address: String, message: String },
    #[error("authentication failed for {user}@{address}: {message}")]
    Auth {
        user: String,
        address: String,
        message: String,
    },
    #[error("session error: {0}")]
    Session(String),
}

/// Errors produced by the AI analysis client
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI analysis is not configured because the {provider} API key is missing")]
    MissingApiKey { provider: String },
    #[error("AI request failed: {0}")]
    Request(String),
    #[error("unexpected AI response: {0}")]
    Response(String),
}

/// Errors produced by the notification dispatcher
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("chat webhook URL is not configured")]
    MissingWebhook,
    #[error("SMTP settings are not fully configured")]
    IncompleteSmtpSettings,
    #[error("notification email recipient is not configured")]
    MissingRecipient,
    #[error("failed to send notification: {0}")]
    Send(String),
}
