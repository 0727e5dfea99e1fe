pub mod error;
pub mod extractor;
pub mod gateway;
pub mod gemini;
pub mod perplexity;
pub mod queries;

pub mod test_support;

pub use error::ClientError;
pub use extractor::{extract_research, extract_sentiment};
pub use gateway::{ChatGateway, SendOptions};
pub use gemini::GeminiGateway;
pub use perplexity::PerplexityGateway;
pub use queries::{news_query, research_query, sentiment_query, BuiltQuery};
