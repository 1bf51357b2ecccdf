use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error;

use crate::retry::RetryableError;

/// A failed HTTP exchange, either below the HTTP layer or as a non-success
/// status reported by the service.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request could not be completed (connection, timeout, body read)
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl TransportError {
    fn is_retryable(&self) -> bool {
        match self {
            TransportError::Request(err) => {
                if err.is_timeout() || err.is_connect() {
                    return true;
                }

                // Check for server errors (5xx)
                if let Some(status) = err.status() {
                    return status.is_server_error() || status.as_u16() == 429;
                }

                // DNS and other network errors
                !err.is_builder() && !err.is_redirect() && !err.is_decode()
            }
            TransportError::Status { status, .. } => {
                (*status >= 500 && *status < 600) || *status == 429
            }
        }
    }
}

/// Error types for DailyMed client operations
#[derive(Error, Debug)]
pub enum DailyMedError {
    /// Drug name search failed
    #[error("drug lookup failed: {source}")]
    LookupError {
        #[source]
        source: TransportError,
    },

    /// Search response could not be interpreted
    #[error("failed to parse search response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Label document download failed
    #[error("label fetch failed for set id {setid}: {source}")]
    FetchError {
        setid: String,
        #[source]
        source: TransportError,
    },

    /// Label document body was empty
    #[error("empty label document for set id {setid}")]
    EmptyDocumentError { setid: String },

    /// Save directory or label file could not be written
    #[error("filesystem error at {}: {source}", .path.display())]
    FilesystemError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Drug query rejected before any request was made
    #[error("invalid drug query: {0}")]
    InvalidQuery(String),

    /// Set id rejected before any request was made
    #[error("invalid set id: {setid:?}")]
    InvalidSetId { setid: String },
}

impl DailyMedError {
    /// Stable kind label for this error, as recorded in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            DailyMedError::LookupError { .. } => "LookupError",
            DailyMedError::ParseError(_) => "ParseError",
            DailyMedError::FetchError { .. } => "FetchError",
            DailyMedError::EmptyDocumentError { .. } => "EmptyDocumentError",
            DailyMedError::FilesystemError { .. } => "FilesystemError",
            DailyMedError::InvalidQuery(_) => "InvalidQuery",
            DailyMedError::InvalidSetId { .. } => "InvalidSetId",
        }
    }
}

pub type Result<T> = result::Result<T, DailyMedError>;

impl RetryableError for DailyMedError {
    fn is_retryable(&self) -> bool {
        match self {
            DailyMedError::LookupError { source } => source.is_retryable(),
            DailyMedError::FetchError { source, .. } => source.is_retryable(),

            // All other errors are not retryable
            DailyMedError::ParseError(_)
            | DailyMedError::EmptyDocumentError { .. }
            | DailyMedError::FilesystemError { .. }
            | DailyMedError::InvalidQuery(_)
            | DailyMedError::InvalidSetId { .. } => false,
        }
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            match self {
                DailyMedError::LookupError { source } | DailyMedError::FetchError { source, .. } => {
                    match source {
                        TransportError::Request(err) if err.is_timeout() => "Request timeout",
                        TransportError::Request(err) if err.is_connect() => "Connection error",
                        TransportError::Request(_) => "Network error",
                        TransportError::Status { status: 429, .. } => "Rate limit exceeded",
                        TransportError::Status { .. } => "Server error",
                    }
                }
                _ => "Transient error",
            }
        } else {
            match self {
                DailyMedError::ParseError(_) => "Invalid JSON response",
                DailyMedError::EmptyDocumentError { .. } => "Empty document",
                DailyMedError::FilesystemError { .. } => "File system error",
                DailyMedError::InvalidQuery(_) | DailyMedError::InvalidSetId { .. } => {
                    "Invalid input"
                }
                _ => "Non-transient error",
            }
        }
    }
}
