use thiserror::Error;

#[derive(Error, Debug)]
pub enum EchoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SWAPI returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("No search results for '{term}' in {resource}")]
    NoSearchResults { resource: String, term: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing path in document: {0}")]
    MissingPath(String),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EchoError>;
