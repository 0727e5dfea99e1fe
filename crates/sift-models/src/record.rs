use serde::{Deserialize, Serialize};

pub const DEFAULT_SENTIMENT: &str = "neutral";
pub const DEFAULT_RECOMMENDATION: &str = "hold";
pub const DEFAULT_RISK_LEVEL: &str = "medium";
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Sentiment analysis result for one subject.
///
/// Every field has a total default so a record is always safe to serialize
/// and display even when extraction partially fails. The label fields
/// (`sentiment`, `recommendation`, `risk_level`) carry whatever string the
/// model produced; membership in the expected vocabulary is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentRecord {
    pub subject: String,
    /// Expected "bullish" | "bearish" | "neutral".
    pub sentiment: String,
    /// Expected range [0, 1]; accepted as given, no clamping.
    pub confidence: f64,
    pub summary: String,
    pub key_factors: Vec<String>,
    pub citations: Vec<String>,
    /// Expected "buy" | "sell" | "hold".
    pub recommendation: String,
    /// Expected "low" | "medium" | "high".
    pub risk_level: String,
}

impl SentimentRecord {
    /// A record built entirely from defaults, used when structured
    /// extraction fails. `summary` carries a human-readable stand-in
    /// (typically a prefix of the raw model text).
    pub fn degraded(subject: impl Into<String>, summary: String, citations: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            sentiment: DEFAULT_SENTIMENT.to_string(),
            confidence: DEFAULT_CONFIDENCE,
            summary,
            key_factors: Vec::new(),
            citations,
            recommendation: DEFAULT_RECOMMENDATION.to_string(),
            risk_level: DEFAULT_RISK_LEVEL.to_string(),
        }
    }
}

/// Research lookup result for one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResearchRecord {
    pub query: String,
    pub answer: String,
    pub citations: Vec<String>,
    pub model_used: String,
    pub tokens_used: u64,
}
