use sift_models::config::ModelsConfig;
use sift_models::ChatMessage;

use crate::error::ClientError;
use crate::gateway::SendOptions;

/// A fully-built query ready to hand to a ChatGateway.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub messages: Vec<ChatMessage>,
    pub options: SendOptions,
}

/// Schema description included in the sentiment system prompt.
fn sentiment_schema() -> String {
    let example = serde_json::json!({
        "sentiment": "bullish | bearish | neutral",
        "confidence": 0.75,
        "summary": "<one-paragraph assessment>",
        "key_factors": ["<driver 1>", "<driver 2>"],
        "recommendation": "buy | sell | hold",
        "risk_level": "low | medium | high"
    });
    serde_json::to_string_pretty(&example).unwrap_or_default()
}

fn validated<'a>(subject: &'a str, what: &str) -> Result<&'a str, ClientError> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidQuery(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

/// Time-boxed news lookup on the fast model.
pub fn news_query(topic: &str, models: &ModelsConfig) -> Result<BuiltQuery, ClientError> {
    let topic = validated(topic, "topic")?;

    Ok(BuiltQuery {
        messages: vec![
            ChatMessage::system(
                "You are a financial news assistant. Summarize only developments from \
                 the last 48 hours. Be concise: a short headline-style digest, most \
                 market-moving items first.",
            ),
            ChatMessage::user(format!("What is the latest news about {topic}?")),
        ],
        options: SendOptions {
            model: models.news_model.clone(),
            temperature: models.temperature,
        },
    })
}

/// In-depth research brief on the higher-quality model.
pub fn research_query(symbol: &str, models: &ModelsConfig) -> Result<BuiltQuery, ClientError> {
    let symbol = validated(symbol, "symbol")?;

    Ok(BuiltQuery {
        messages: vec![
            ChatMessage::system(
                "You are a markets research analyst. Produce a structured brief: \
                 current price action, fundamentals, recent catalysts, and key risks. \
                 Cite concrete figures where available.",
            ),
            ChatMessage::user(format!(
                "Research {symbol}: what is the current state, outlook, and what \
                 should an investor watch?"
            )),
        ],
        options: SendOptions {
            model: models.research_model.clone(),
            temperature: models.temperature,
        },
    })
}

/// Sentiment analysis with a JSON-only instruction and an explicit schema.
pub fn sentiment_query(symbol: &str, models: &ModelsConfig) -> Result<BuiltQuery, ClientError> {
    let symbol = validated(symbol, "symbol")?;

    let system = format!(
        "You are a market sentiment analyst. Assess the current sentiment for the \
         subject using recent news, price action, and market commentary.\n\n\
         You MUST respond with ONLY a JSON object matching this schema:\n{}\n\n\
         The confidence field is a number between 0.0 and 1.0. Do not wrap the \
         JSON in prose.",
        sentiment_schema()
    );

    Ok(BuiltQuery {
        messages: vec![
            ChatMessage::system(system),
            ChatMessage::user(format!("Analyze the market sentiment for {symbol}.")),
        ],
        options: SendOptions {
            model: models.sentiment_model.clone(),
            temperature: models.temperature,
        },
    })
}
