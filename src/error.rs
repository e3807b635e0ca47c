//! Error types for the Data API SDK
//!
//! This module defines the error hierarchy for the entire SDK.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::http::ApiError;
use thiserror::Error;

/// The main error type for the Data API SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    // ============================================================================
    // Data API Errors
    // ============================================================================
    /// The API answered with a non-empty `errors` array in the envelope.
    #[error("Data API error: {}", format_api_errors(.errors))]
    Api { errors: Vec<ApiError> },

    // ============================================================================
    // Cursor Errors
    // ============================================================================
    #[error("Cursor {cursor_id} is closed")]
    CursorClosed { cursor_id: u64 },

    #[error("Invalid cursor index key: {key} (expected an integer or integer range)")]
    InvalidIndexKey { key: String },

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Invalid field path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("Operation '{operation}' requires a non-empty filter; use delete_all for unconditional deletion")]
    EmptyFilter { operation: String },

    #[error("Document count exceeds upper bound of {upper_bound}")]
    TooManyDocuments { upper_bound: u64 },

    // ============================================================================
    // Batch Errors
    // ============================================================================
    /// An insert_many stopped (ordered) or finished (unordered) with failures.
    /// Carries the ids that were successfully inserted before/despite them.
    #[error("insert_many failed after inserting {} documents: {cause}", inserted_ids.len())]
    InsertMany {
        inserted_ids: Vec<serde_json::Value>,
        #[source]
        cause: Box<Error>,
    },

    /// A bulk_write stopped (ordered) or finished (unordered) with failures.
    #[error("bulk_write failed with {} error(s); first: {}", causes.len(), first_cause(.causes))]
    BulkWrite {
        partial_result: Box<crate::collection::BulkWriteResult>,
        causes: Vec<Error>,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a closed-cursor error
    pub fn cursor_closed(cursor_id: u64) -> Self {
        Self::CursorClosed { cursor_id }
    }

    /// Create an invalid index key error
    pub fn invalid_index_key(key: impl std::fmt::Display) -> Self {
        Self::InvalidIndexKey {
            key: key.to_string(),
        }
    }

    /// Create an invalid field path error
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an empty-filter error
    pub fn empty_filter(operation: impl Into<String>) -> Self {
        Self::EmptyFilter {
            operation: operation.into(),
        }
    }

    /// Check if this error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn format_api_errors(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn first_cause(causes: &[Error]) -> String {
    causes
        .first()
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}

/// Result type alias for the Data API SDK
pub type Result<T> = std::result::Result<T, Error>;
