use async_trait::async_trait;
use sift_models::{ChatMessage, ChatResponse};

use crate::error::ClientError;

/// Per-request options applied by a gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOptions {
    pub model: String,
    /// Low by default: downstream extraction assumes low-entropy formatting.
    pub temperature: f64,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            model: "sonar".to_string(),
            temperature: 0.2,
        }
    }
}

/// One request/response exchange with an upstream generative-text API.
/// Backends are interchangeable behind this trait; mockable for testing.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Send one conversation and return the raw response envelope.
    /// Makes exactly one outbound network call; no retry.
    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &SendOptions,
    ) -> Result<ChatResponse, ClientError>;
}

/// Truncate an upstream error body for display.
pub(crate) fn excerpt(body: &str) -> String {
    const MAX: usize = 500;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
