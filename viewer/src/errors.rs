use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Network error: status {status}: {body}")]
    Network { status: u16, body: String },

    #[error("Request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
