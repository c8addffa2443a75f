//! Chat webhook notifications
//!
//! Messages over the webhook's size limit are split into numbered chunks on
//! newline boundaries and sent in order with a short delay between posts to
//! stay under rate limits.

use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::NotifyError;

/// Safe per-message character limit for chat webhooks
const MAX_MESSAGE_LEN: usize = 1990;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const INTER_CHUNK_DELAY: Duration = Duration::from_secs(1);

/// Webhook-backed chat notifier
pub struct ChatNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    inter_chunk_delay: Duration,
}

impl ChatNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            webhook_url: webhook_url.filter(|u| !u.trim().is_empty()),
            inter_chunk_delay: INTER_CHUNK_DELAY,
        }
    }

    #[cfg(test)]
    fn without_delay(webhook_url: Option<String>) -> Self {
        Self {
            inter_chunk_delay: Duration::ZERO,
            ..Self::new(webhook_url)
        }
    }

    /// Sends a message, splitting it into numbered chunks when oversized
    pub async fn send(&self, message: &str) -> Result<String, NotifyError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(NotifyError::MissingWebhook)?;

        let chunks = chunk_message(message, MAX_MESSAGE_LEN);
        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.inter_chunk_delay).await;
            }
            self.post_chunk(url, chunk)
                .await
                .map_err(|e| NotifyError::Send(format!("failed to send chunk {}: {}", i + 1, e)))?;
            debug!("Sent chat chunk {}/{}", i + 1, total);
        }

        if total == 1 {
            info!("Sent single-part chat message");
            Ok("Message sent".to_string())
        } else {
            info!("Sent {}-part chat message", total);
            Ok(format!("{}-part message sent", total))
        }
    }

    async fn post_chunk(&self, url: &str, content: &str) -> Result<(), String> {
        let response = self
            .client
            .post(url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        response.error_for_status().map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Splits a message into sendable parts.
///
/// Short messages pass through untouched. Oversized messages split on the
/// last newline before the limit (hard split when a single line exceeds it)
/// and each part gains a "(Message i/total)" header line.
fn chunk_message(message: &str, max_len: usize) -> Vec<String> {
    if message.len() <= max_len {
        return vec![message.to_string()];
    }

    let mut parts = Vec::new();
    let mut remaining = message;
    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            parts.push(remaining.to_string());
            break;
        }
        let window = &remaining[..floor_char_boundary(remaining, max_len)];
        let split_at = window.rfind('\n').unwrap_or(window.len());
        let split_at = if split_at == 0 { window.len() } else { split_at };
        parts.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    let total = parts.len();
    parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| format!("**(Message {}/{})**\n{}", i + 1, total, part))
        .collect()
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_passes_through() {
        let chunks = chunk_message("all good", MAX_MESSAGE_LEN);
        assert_eq!(chunks, vec!["all good".to_string()]);
    }

    #[test]
    fn test_long_message_chunks_with_numbering() {
        // 100 lines of 49 chars + newline each = 5000 chars.
        let line = "x".repeat(49);
        let message = std::iter::repeat(line)
            .take(100)
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(message.len(), 4999);

        let chunks = chunk_message(&message, MAX_MESSAGE_LEN);
        assert!(chunks.len() >= 3, "expected >= 3 chunks, got {}", chunks.len());

        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            let header = format!("**(Message {}/{})**\n", i + 1, total);
            assert!(chunk.starts_with(&header), "chunk {} missing header", i + 1);
            let body = &chunk[header.len()..];
            assert!(body.len() <= MAX_MESSAGE_LEN);
        }

        // Splits happen on line boundaries, so reassembly preserves content.
        let reassembled: Vec<String> = chunks
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let header = format!("**(Message {}/{})**\n", i + 1, total);
                c[header.len()..].to_string()
            })
            .collect();
        assert_eq!(reassembled.join("\n"), message);
    }

    #[test]
    fn test_single_long_line_hard_splits() {
        let message = "y".repeat(4500);
        let chunks = chunk_message(&message, MAX_MESSAGE_LEN);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            let body_start = chunk.find('\n').unwrap() + 1;
            assert!(chunk.len() - body_start <= MAX_MESSAGE_LEN);
        }
    }

    #[tokio::test]
    async fn test_missing_webhook_fails_closed() {
        let notifier = ChatNotifier::without_delay(None);
        let err = notifier.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::MissingWebhook));

        let notifier = ChatNotifier::without_delay(Some("  ".to_string()));
        assert!(notifier.send("hello").await.is_err());
    }
}
