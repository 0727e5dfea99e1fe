pub mod chat;
pub mod config;
pub mod record;
pub mod signal;

pub use chat::{ChatMessage, ChatResponse, Role, TokenUsage};
pub use config::{BackendKind, GatewayConfig, ModelsConfig, SiftConfig, StoreConfig};
pub use record::{
    ResearchRecord, SentimentRecord, DEFAULT_CONFIDENCE, DEFAULT_RECOMMENDATION,
    DEFAULT_RISK_LEVEL, DEFAULT_SENTIMENT,
};
pub use signal::{Signal, SignalRecord};
