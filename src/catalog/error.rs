//! Catalog API error classification.

use thiserror::Error;

use crate::ui::view::ErrorKind;

/// Errors that can occur while fetching a catalog page.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Base URL could not be joined with the products path
    #[error("Invalid catalog URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Failed to reach the catalog server
    #[error("Connection to catalog failed: {source}")]
    Connection {
        #[source]
        source: reqwest::Error,
    },

    /// No response within the fetch deadline
    #[error("Catalog request timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Non-2xx response
    #[error("Catalog returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body is not a product page
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// How the error is surfaced in the view model.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            CatalogError::InvalidUrl { .. } => ErrorKind::Network,
            CatalogError::Connection { .. } => ErrorKind::Network,
            CatalogError::Timeout { .. } => ErrorKind::Network,
            CatalogError::Status { status: 422, .. } => ErrorKind::Validation,
            CatalogError::Status { .. } => ErrorKind::Server,
            CatalogError::Decode(_) => ErrorKind::Server,
        }
    }

    /// Short tag for structured logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            CatalogError::InvalidUrl { .. } => "invalid_url",
            CatalogError::Connection { .. } => "connection_error",
            CatalogError::Timeout { .. } => "timeout",
            CatalogError::Status { .. } => "status_error",
            CatalogError::Decode(_) => "decode_error",
        }
    }
}
