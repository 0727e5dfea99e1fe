use serde_json::{Map, Value};
use sift_models::record::{
    DEFAULT_CONFIDENCE, DEFAULT_RECOMMENDATION, DEFAULT_RISK_LEVEL, DEFAULT_SENTIMENT,
};
use sift_models::{ChatResponse, ResearchRecord, SentimentRecord};
use tracing::debug;

/// Length of the raw-text prefix used as the summary when no structured
/// payload can be extracted.
const SUMMARY_PREFIX_CHARS: usize = 240;

/// Locate and parse a JSON object embedded in free-form model text.
///
/// The span is anchored at the first `{` and initially runs to the last `}`
/// in the whole text; if that does not parse, the end shrinks backward
/// through earlier `}` positions until a span parses as an object. Code
/// fences need no special handling since only brace boundaries matter.
/// Prose containing `{` before the payload still defeats extraction; that
/// permissiveness is intentional and matched by the degraded fallback.
fn parsed_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let mut end = text.rfind('}')?;

    loop {
        if end < start {
            return None;
        }
        let span = &text[start..=end];
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(span) {
            return Some(obj);
        }
        end = text[..end].rfind('}')?;
    }
}

/// Read a string field, substituting `default` when absent or wrong-typed.
fn string_field(obj: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Read a numeric field. Values outside [0, 1] are accepted as given.
fn number_field(obj: &Map<String, Value>, key: &str, default: f64) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Read a string-array field; non-string elements are skipped.
fn string_list_field(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn summary_prefix(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(SUMMARY_PREFIX_CHARS) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}

/// Build a SentimentRecord from raw model output. Total: on any parse or
/// extraction failure the result degrades to documented defaults with a
/// raw-text prefix as the summary. Citations always come from the response
/// envelope, never from the model-authored JSON.
pub fn extract_sentiment(subject: &str, response: &ChatResponse) -> SentimentRecord {
    let Some(obj) = parsed_object(&response.text) else {
        debug!(subject, "No structured payload in model output; using defaults");
        return SentimentRecord::degraded(
            subject,
            summary_prefix(&response.text),
            response.citations.clone(),
        );
    };

    SentimentRecord {
        subject: subject.to_string(),
        sentiment: string_field(&obj, &["sentiment"], DEFAULT_SENTIMENT),
        confidence: number_field(&obj, "confidence", DEFAULT_CONFIDENCE),
        summary: string_field(&obj, &["summary", "reasoning"], ""),
        key_factors: string_list_field(&obj, &["key_factors", "keyFactors"]),
        citations: response.citations.clone(),
        recommendation: string_field(&obj, &["recommendation"], DEFAULT_RECOMMENDATION),
        risk_level: string_field(&obj, &["risk_level", "riskLevel"], DEFAULT_RISK_LEVEL),
    }
}

/// Build a ResearchRecord from raw model output. Total: when the output
/// carries a JSON object with a string `answer`, that field wins; otherwise
/// the full raw text is the answer.
pub fn extract_research(query: &str, model: &str, response: &ChatResponse) -> ResearchRecord {
    let answer = parsed_object(&response.text)
        .and_then(|obj| obj.get("answer").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| response.text.clone());

    ResearchRecord {
        query: query.to_string(),
        answer,
        citations: response.citations.clone(),
        model_used: model.to_string(),
        tokens_used: response.usage.total_tokens,
    }
}
