use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream API error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Model returned an empty response")]
    Empty,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Missing credential: set the {0} environment variable")]
    MissingCredential(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
