//! Error handling for pagereq

use thiserror::Error;

/// Main error type for paged request operations
#[derive(Error, Debug)]
pub enum PageReqError {
    #[error("Do get request failed. Missing url.")]
    MissingUrl,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for pagereq operations
pub type Result<T> = std::result::Result<T, PageReqError>;
