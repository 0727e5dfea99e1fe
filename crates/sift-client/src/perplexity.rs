use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_models::{ChatMessage, ChatResponse, TokenUsage};
use tracing::{debug, warn};

use async_trait::async_trait;

use crate::error::ClientError;
use crate::gateway::{excerpt, ChatGateway, SendOptions};

pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

/// JSON-chat style backend: the full message sequence is posted to a
/// `/chat/completions` endpoint with bearer-token auth.
pub struct PerplexityGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    usage: UsageBody,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize, Default)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

impl PerplexityGateway {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ClientError> {
        Self::with_base_url(api_key, timeout, PERPLEXITY_BASE_URL.to_string())
    }

    /// Point the gateway at a different endpoint (testing, proxies).
    pub fn with_base_url(
        api_key: String,
        timeout: Duration,
        base_url: String,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ChatGateway for PerplexityGateway {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &SendOptions,
    ) -> Result<ChatResponse, ClientError> {
        debug!(model = %options.model, messages = messages.len(), "Sending chat completion");

        let body = ChatCompletionRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Upstream request failed");
            return Err(ClientError::Upstream {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ClientError::Empty);
        }

        Ok(ChatResponse {
            text,
            citations: parsed.citations,
            usage: TokenUsage {
                prompt_tokens: parsed.usage.prompt_tokens,
                completion_tokens: parsed.usage.completion_tokens,
                total_tokens: parsed.usage.total_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_models::Role;

    #[test]
    fn request_body_shape() {
        let messages = vec![
            ChatMessage::system("Be concise."),
            ChatMessage::user("What moved BTC today?"),
        ];
        let body = ChatCompletionRequest {
            model: "sonar",
            messages: &messages,
            temperature: 0.2,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "sonar");
        assert_eq!(value["temperature"], 0.2);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "What moved BTC today?");
    }

    #[test]
    fn response_envelope_parses() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "BTC rallied."}}],
            "citations": ["https://example.com/a", "https://example.com/b"],
            "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "BTC rallied.");
        assert_eq!(parsed.citations.len(), 2);
        assert_eq!(parsed.usage.total_tokens, 150);
    }

    #[test]
    fn response_envelope_tolerates_missing_optionals() {
        let json = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.citations.is_empty());
        assert_eq!(parsed.usage.total_tokens, 0);
    }

    #[test]
    fn message_roles_serialize_for_the_wire() {
        let msg = ChatMessage {
            role: Role::Assistant,
            content: "ack".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
    }
}
