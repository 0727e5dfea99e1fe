//! SIFT - Signal Inference From Text
//!
//! A CLI that queries upstream chat-completion APIs for market research and
//! sentiment, extracts fixed-shape records from the free-form model output,
//! and appends them to a file-backed JSON-array signal store.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use sift::models::{SiftConfig, SentimentRecord};
//! use sift::client::{ChatGateway, PerplexityGateway};
//! use sift::store::SignalStore;
//! ```

pub use sift_client as client;
pub use sift_models as models;
pub use sift_store as store;

use std::sync::Arc;
use std::time::Duration;

use sift_client::{ChatGateway, ClientError, GeminiGateway, PerplexityGateway};
use sift_models::config::{BackendKind, GatewayConfig, ModelsConfig};
use sift_models::{ResearchRecord, SentimentRecord};
use tracing::info;

/// Read the API credential from the environment, exactly once at startup.
/// Absence is fatal before any network activity.
pub fn resolve_api_key(config: &GatewayConfig) -> Result<String, ClientError> {
    let var = config.api_key_var();
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ClientError::MissingCredential(var.to_string()))
}

/// Build the configured gateway backend. The credential is threaded in
/// explicitly; no component reads the process environment.
pub fn build_gateway(
    config: &GatewayConfig,
    api_key: String,
) -> Result<Arc<dyn ChatGateway>, ClientError> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let gateway: Arc<dyn ChatGateway> = match (config.backend, &config.base_url) {
        (BackendKind::Perplexity, Some(base)) => {
            Arc::new(PerplexityGateway::with_base_url(api_key, timeout, base.clone())?)
        }
        (BackendKind::Perplexity, None) => Arc::new(PerplexityGateway::new(api_key, timeout)?),
        (BackendKind::Gemini, Some(base)) => {
            Arc::new(GeminiGateway::with_base_url(api_key, timeout, base.clone())?)
        }
        (BackendKind::Gemini, None) => Arc::new(GeminiGateway::new(api_key, timeout)?),
    };
    Ok(gateway)
}

/// News lookup: returns a ResearchRecord (ephemeral, not persisted here).
pub async fn run_news(
    gateway: &dyn ChatGateway,
    models: &ModelsConfig,
    topic: &str,
) -> Result<ResearchRecord, ClientError> {
    let query = sift_client::news_query(topic, models)?;
    let response = gateway.send(&query.messages, &query.options).await?;
    info!(
        backend = gateway.name(),
        model = %query.options.model,
        tokens = response.usage.total_tokens,
        "News lookup complete"
    );
    Ok(sift_client::extract_research(topic, &query.options.model, &response))
}

/// Research brief for a symbol.
pub async fn run_research(
    gateway: &dyn ChatGateway,
    models: &ModelsConfig,
    symbol: &str,
) -> Result<ResearchRecord, ClientError> {
    let query = sift_client::research_query(symbol, models)?;
    let response = gateway.send(&query.messages, &query.options).await?;
    info!(
        backend = gateway.name(),
        model = %query.options.model,
        tokens = response.usage.total_tokens,
        citations = response.citations.len(),
        "Research complete"
    );
    Ok(sift_client::extract_research(symbol, &query.options.model, &response))
}

/// Sentiment analysis for a symbol.
pub async fn run_sentiment(
    gateway: &dyn ChatGateway,
    models: &ModelsConfig,
    symbol: &str,
) -> Result<SentimentRecord, ClientError> {
    let query = sift_client::sentiment_query(symbol, models)?;
    let response = gateway.send(&query.messages, &query.options).await?;
    info!(
        backend = gateway.name(),
        model = %query.options.model,
        tokens = response.usage.total_tokens,
        "Sentiment analysis complete"
    );
    Ok(sift_client::extract_sentiment(symbol, &response))
}
