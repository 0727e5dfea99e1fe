use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_models::{ChatMessage, ChatResponse, Role, TokenUsage};
use tracing::{debug, warn};

use async_trait::async_trait;

use crate::error::ClientError;
use crate::gateway::{excerpt, ChatGateway, SendOptions};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Single-prompt style backend: the conversation is flattened into one text
/// block and posted to a `models/{model}:generateContent` endpoint with the
/// API key as a query-string parameter.
pub struct GeminiGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: UsageMetadata,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
    #[serde(default)]
    total_token_count: u64,
}

impl GeminiGateway {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ClientError> {
        Self::with_base_url(api_key, timeout, GEMINI_BASE_URL.to_string())
    }

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

/// Collapse an ordered message sequence into a single prompt, system text
/// first, turns separated by blank lines.
fn flatten_messages(messages: &[ChatMessage]) -> String {
    let mut sections: Vec<&str> = Vec::new();
    for msg in messages {
        if msg.role == Role::System {
            sections.push(&msg.content);
        }
    }
    for msg in messages {
        if msg.role != Role::System {
            sections.push(&msg.content);
        }
    }
    sections.join("\n\n")
}

#[async_trait]
impl ChatGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &SendOptions,
    ) -> Result<ChatResponse, ClientError> {
        debug!(model = %options.model, messages = messages.len(), "Sending generate-content request");

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: flatten_messages(messages),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
            },
        };

        let response = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, options.model
            ))
            .query(&[("key", self.api_key.as_str())])
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

        let parsed: GenerateContentResponse = response.json().await?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ClientError::Empty);
        }

        Ok(ChatResponse {
            text,
            // This backend reports no source URLs.
            citations: Vec::new(),
            usage: TokenUsage {
                prompt_tokens: parsed.usage_metadata.prompt_token_count,
                completion_tokens: parsed.usage_metadata.candidates_token_count,
                total_tokens: parsed.usage_metadata.total_token_count,
            },
        })
    }
}
