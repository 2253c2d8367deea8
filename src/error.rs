//! Error types
//!
//! Nothing here becomes a structured client error. Every variant is turned
//! into a 5xx by the front door; 405 is a normal response, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("environment variable {0} is not set")]
    MissingUrl(String),

    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Unparseable request body, or one that is not a JSON object
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An upload field holding an array or object
    #[error("field {0} cannot be stored as text")]
    UnsupportedField(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = HandlerError> = std::result::Result<T, E>;
