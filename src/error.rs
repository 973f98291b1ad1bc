use reqwest::StatusCode;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Failure of a credential or session store operation.
///
/// "Not found" is never an error: lookups return `Ok(None)` instead.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream error with status {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl StoreError {
    /// Upstream rejection helper used by the REST backend.
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        StoreError::Upstream {
            status,
            message: message.into(),
        }
    }
}
