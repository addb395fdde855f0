//! Error types for jsonsets
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using JsonSetsError
pub type Result<T> = std::result::Result<T, JsonSetsError>;

/// Unified error type for jsonsets operations
#[derive(Debug, Error)]
pub enum JsonSetsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to list sets in {}: {source}", .path.display())]
    SetsListing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Document Errors
    // -------------------------------------------------------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("prodLoad : unable to get file prod ({})", .0.display())]
    MissingProduction(PathBuf),

    #[error("aggregate document must be an object, found {0}")]
    InvalidAggregate(&'static str),

    #[error("invalid set name '{0}'")]
    InvalidSetName(String),

    // -------------------------------------------------------------------------
    // Path Errors
    // -------------------------------------------------------------------------
    #[error("malformed path '{0}'")]
    MalformedPath(String),

    #[error("cannot descend into {kind} at '{segment}' of path '{path}'")]
    PathConflict {
        path: String,
        segment: String,
        kind: &'static str,
    },

    #[error("index {index} out of range (len {len}) in path '{path}'")]
    IndexOutOfRange {
        path: String,
        index: String,
        len: usize,
    },

    #[error("target of '{path}' is not a sequence (found {found})")]
    NotASequence { path: String, found: &'static str },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
