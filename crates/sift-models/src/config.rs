use serde::{Deserialize, Serialize};

/// Which upstream chat API to send requests to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Perplexity,
    Gemini,
}

/// Top-level configuration for SIFT.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SiftConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration for the chat gateway layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Override the upstream base URL. Falls back to the backend's default.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API credential.
    /// Falls back to the backend's conventional variable name.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: None,
            api_key_env: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl GatewayConfig {
    /// The environment variable the API key is read from.
    pub fn api_key_var(&self) -> &str {
        match &self.api_key_env {
            Some(var) => var,
            None => match self.backend {
                BackendKind::Perplexity => "PERPLEXITY_API_KEY",
                BackendKind::Gemini => "GEMINI_API_KEY",
            },
        }
    }
}

/// Model selection per query type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelsConfig {
    /// Fast model for time-boxed news lookups.
    #[serde(default = "default_news_model")]
    pub news_model: String,
    /// Higher-quality model for in-depth research.
    #[serde(default = "default_research_model")]
    pub research_model: String,
    /// Model for sentiment analysis.
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,
    /// Sampling temperature for all queries. Kept low so the output stays
    /// deterministic enough for structured extraction.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            news_model: default_news_model(),
            research_model: default_research_model(),
            sentiment_model: default_sentiment_model(),
            temperature: default_temperature(),
        }
    }
}

/// Configuration for the signal store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Path to the JSON-array signal file.
    #[serde(default = "default_signals_path")]
    pub signals_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            signals_path: default_signals_path(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    60
}
fn default_news_model() -> String {
    "sonar".to_string()
}
fn default_research_model() -> String {
    "sonar-pro".to_string()
}
fn default_sentiment_model() -> String {
    "sonar".to_string()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_signals_path() -> String {
    "data/signals.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_sift_config() {
        let config = SiftConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SiftConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_credential_variable_follows_backend() {
        let mut gateway = GatewayConfig::default();
        assert_eq!(gateway.api_key_var(), "PERPLEXITY_API_KEY");

        gateway.backend = BackendKind::Gemini;
        assert_eq!(gateway.api_key_var(), "GEMINI_API_KEY");

        gateway.api_key_env = Some("MY_KEY".to_string());
        assert_eq!(gateway.api_key_var(), "MY_KEY");
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[gateway]
backend = "gemini"
timeout_seconds = 30

[models]
news_model = "gemini-2.0-flash"
research_model = "gemini-2.5-pro"
sentiment_model = "gemini-2.0-flash"
temperature = 0.1

[store]
signals_path = "/tmp/signals.json"
"#;

        let config: SiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.backend, BackendKind::Gemini);
        assert_eq!(config.gateway.timeout_seconds, 30);
        assert_eq!(config.models.research_model, "gemini-2.5-pro");
        assert_eq!(config.store.signals_path, "/tmp/signals.json");
    }

    #[test]
    fn config_from_empty_toml_uses_defaults() {
        let config: SiftConfig = toml::from_str("").unwrap();
        assert_eq!(config.gateway.backend, BackendKind::Perplexity);
        assert_eq!(config.gateway.timeout_seconds, 60);
        assert_eq!(config.models.news_model, "sonar");
        assert_eq!(config.models.temperature, 0.2);
        assert_eq!(config.store.signals_path, "data/signals.json");
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let toml_str = r#"
[models]
temperature = 0.3
"#;
        let config: SiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.temperature, 0.3);
        assert_eq!(config.models.research_model, "sonar-pro");
        assert_eq!(config.gateway.timeout_seconds, 60);
    }
}
