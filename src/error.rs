//! Error types for the replicate-eval library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column '{0}' in similarity table")]
    MissingColumn(String),

    #[error("Invalid similarity table: {0}")]
    InvalidTable(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Asymmetric pair counts: {0}")]
    AsymmetricPairs(String),

    #[error("Empty data: {0}")]
    EmptyData(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, EvalError>;
