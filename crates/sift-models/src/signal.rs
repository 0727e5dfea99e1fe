use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ResearchRecord, SentimentRecord};

/// The structured payload of one signal. Untagged: the two shapes are
/// distinguished by their fields (`sentiment` vs `query`/`answer`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SignalRecord {
    Sentiment(SentimentRecord),
    Research(ResearchRecord),
}

impl From<SentimentRecord> for SignalRecord {
    fn from(record: SentimentRecord) -> Self {
        Self::Sentiment(record)
    }
}

impl From<ResearchRecord> for SignalRecord {
    fn from(record: ResearchRecord) -> Self {
        Self::Research(record)
    }
}

/// One persisted signal: a structured record plus its capture timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: SignalRecord,
}

impl Signal {
    /// Stamp a record with a fresh id and the current time.
    pub fn now(record: SignalRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment_record() -> SentimentRecord {
        SentimentRecord {
            subject: "BTC".to_string(),
            sentiment: "bullish".to_string(),
            confidence: 0.8,
            summary: "ETF inflows strong".to_string(),
            key_factors: vec!["ETF inflows".to_string()],
            citations: vec![],
            recommendation: "buy".to_string(),
            risk_level: "medium".to_string(),
        }
    }

    #[test]
    fn signal_flattens_record_fields() {
        let signal = Signal::now(sentiment_record().into());
        let value = serde_json::to_value(&signal).unwrap();

        // Record fields sit next to id/recorded_at, not nested.
        assert!(value.get("id").is_some());
        assert!(value.get("recorded_at").is_some());
        assert_eq!(value["subject"], "BTC");
        assert_eq!(value["sentiment"], "bullish");
        assert!(value.get("record").is_none());
    }

    #[test]
    fn roundtrip_sentiment_signal() {
        let signal = Signal::now(sentiment_record().into());
        let json = serde_json::to_string(&signal).unwrap();
        let deserialized: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(signal, deserialized);
    }

    #[test]
    fn roundtrip_research_signal() {
        let record = ResearchRecord {
            query: "NVDA outlook".to_string(),
            answer: "Growth driven by data-center demand.".to_string(),
            citations: vec!["https://example.com".to_string()],
            model_used: "sonar-pro".to_string(),
            tokens_used: 300,
        };
        let signal = Signal::now(record.into());

        let json = serde_json::to_string(&signal).unwrap();
        let deserialized: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(signal, deserialized);
        assert!(matches!(deserialized.record, SignalRecord::Research(_)));
    }
}
