//! Test support: a canned-response gateway so the pipeline can be exercised
//! without network access.

use async_trait::async_trait;
use sift_models::{ChatMessage, ChatResponse, TokenUsage};

use crate::error::ClientError;
use crate::gateway::{ChatGateway, SendOptions};

/// A gateway that returns a fixed response (or a fixed failure).
pub struct MockGateway {
    pub response: ChatResponse,
    pub should_fail: bool,
}

impl MockGateway {
    pub fn new(text: &str) -> Self {
        Self {
            response: ChatResponse {
                text: text.to_string(),
                citations: vec![],
                usage: TokenUsage::default(),
            },
            should_fail: false,
        }
    }

    pub fn with_citations(text: &str, citations: &[&str]) -> Self {
        let mut mock = Self::new(text);
        mock.response.citations = citations.iter().map(|c| c.to_string()).collect();
        mock
    }

    pub fn with_usage(mut self, total_tokens: u64) -> Self {
        self.response.usage = TokenUsage {
            prompt_tokens: total_tokens / 2,
            completion_tokens: total_tokens - total_tokens / 2,
            total_tokens,
        };
        self
    }

    pub fn failing() -> Self {
        let mut mock = Self::new("");
        mock.should_fail = true;
        mock
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(
        &self,
        _messages: &[ChatMessage],
        _options: &SendOptions,
    ) -> Result<ChatResponse, ClientError> {
        if self.should_fail {
            return Err(ClientError::Upstream {
                status: 503,
                body: "mock failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}
