use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sift_models::{Signal, SignalRecord};
use tracing::warn;

use crate::error::StoreError;

/// Append-only signal store backed by a JSON-array file.
///
/// The file is read in full, the new signal is appended, and the whole
/// array is rewritten pretty-printed in a single write. Existing entries
/// are carried as raw JSON values so an append never alters their field
/// content. Unparseable file content is discarded and the store restarts
/// from an empty array — corrupt data is NOT preserved. There is no lock:
/// concurrent writers race and the later write wins.
pub struct SignalStore {
    path: PathBuf,
}

impl SignalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp `record` with a fresh id and the current time, append it, and
    /// rewrite the file. Returns the new total number of signals.
    pub fn append(&self, record: &SignalRecord) -> Result<usize, StoreError> {
        let signal = Signal::now(record.clone());

        let mut entries = self.entries()?;
        entries.push(serde_json::to_value(&signal)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let count = entries.len();
        let content = serde_json::to_string_pretty(&Value::Array(entries))?;
        fs::write(&self.path, content)?;

        Ok(count)
    }

    /// Read the current entries leniently as raw JSON values.
    ///
    /// Missing file → empty. Unparseable content → empty (discarded).
    /// A bare object → one-element list (legacy format). Any other
    /// non-array value is treated like corruption.
    pub fn entries(&self) -> Result<Vec<Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(Value::Object(obj)) => Ok(vec![Value::Object(obj)]),
            Ok(_) => {
                warn!(path = %self.path.display(), "Signal file is not an array or object; discarding content");
                Ok(Vec::new())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Signal file is corrupt; discarding content");
                Ok(Vec::new())
            }
        }
    }

    /// Number of signals currently on disk.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_models::{ResearchRecord, SentimentRecord};

    fn sentiment_record(subject: &str) -> SignalRecord {
        SentimentRecord {
            subject: subject.to_string(),
            sentiment: "bullish".to_string(),
            confidence: 0.8,
            summary: "ETF inflows strong".to_string(),
            key_factors: vec!["ETF inflows".to_string()],
            citations: vec![],
            recommendation: "buy".to_string(),
            risk_level: "medium".to_string(),
        }
        .into()
    }

    fn research_record(query: &str) -> SignalRecord {
        ResearchRecord {
            query: query.to_string(),
            answer: "Demand remains strong.".to_string(),
            citations: vec!["https://example.com".to_string()],
            model_used: "sonar-pro".to_string(),
            tokens_used: 200,
        }
        .into()
    }

    fn store_in(dir: &tempfile::TempDir) -> SignalStore {
        SignalStore::new(dir.path().join("signals.json"))
    }

    #[test]
    fn append_to_missing_file_creates_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let count = store.append(&sentiment_record("BTC")).unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn append_preserves_prior_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.append(&sentiment_record("BTC")).unwrap();
        let first_after_one = store.entries().unwrap()[0].clone();

        let count = store.append(&sentiment_record("ETH")).unwrap();
        assert_eq!(count, 2);

        let entries = store.entries().unwrap();
        // First entry untouched, including its timestamp.
        assert_eq!(entries[0], first_after_one);
        assert_eq!(entries[1]["subject"], "ETH");
    }

    #[test]
    fn append_stamps_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&sentiment_record("BTC")).unwrap();

        let entry = &store.entries().unwrap()[0];
        assert!(entry.get("id").and_then(Value::as_str).is_some());
        let recorded_at = entry.get("recorded_at").and_then(Value::as_str).unwrap();
        assert!(recorded_at.parse::<chrono::DateTime<chrono::Utc>>().is_ok());
    }

    #[test]
    fn corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json").unwrap();

        let count = store.append(&sentiment_record("BTC")).unwrap();
        assert_eq!(count, 1);

        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["subject"], "BTC");
    }

    #[test]
    fn legacy_single_object_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"subject": "DOGE", "sentiment": "bearish"}"#).unwrap();

        let count = store.append(&sentiment_record("BTC")).unwrap();
        assert_eq!(count, 2);

        let entries = store.entries().unwrap();
        assert_eq!(entries[0]["subject"], "DOGE");
        assert_eq!(entries[1]["subject"], "BTC");
    }

    #[test]
    fn scalar_content_treated_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "42").unwrap();

        let count = store.append(&research_record("NVDA outlook")).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn file_is_an_array_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&research_record("NVDA outlook")).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert!(value.is_array());
        // Pretty-printed, not a single line.
        assert!(content.contains('\n'));
    }

    #[test]
    fn mixed_record_shapes_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.append(&sentiment_record("BTC")).unwrap();
        let count = store.append(&research_record("NVDA outlook")).unwrap();
        assert_eq!(count, 2);

        let entries = store.entries().unwrap();
        assert_eq!(entries[0]["sentiment"], "bullish");
        assert_eq!(entries[1]["query"], "NVDA outlook");
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let store = SignalStore::new(dir.path().join("nested/dir/signals.json"));

        let count = store.append(&sentiment_record("BTC")).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_store_reports_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty().unwrap());
        store.append(&sentiment_record("BTC")).unwrap();
        assert!(!store.is_empty().unwrap());
    }
}
