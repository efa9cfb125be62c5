//! Application error types.

use thiserror::Error;
use tienda_domain::DomainError;
use tienda_orders::OrderError;
use tienda_store::StoreError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Order workflow error
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Malformed command input
    #[error("Invalid input: {0}")]
    Input(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
