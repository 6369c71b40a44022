//! Core error types for focusshield-core.
//!
//! One enum per subsystem, rolled up into [`CoreError`] with thiserror.
//! Read-side failures (block checks, badge refreshes) are degraded to safe
//! defaults at the call site rather than propagated; these types cover the
//! command paths where the caller gets one error and no retry.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for focusshield-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistent store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// User-input validation failures
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Import document failures
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Network-filter rule failures
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Persistent-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another writer
    #[error("Store is locked")]
    Locked,

    /// A stored value could not be decoded as the expected shape
    #[error("Value under '{key}' is not valid JSON for its type: {message}")]
    Corrupt { key: String, message: String },
}

/// User-input validation errors. Surfaced once, nothing applied.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Domain failed syntax validation
    #[error("Invalid domain '{domain}': {message}")]
    InvalidDomain { domain: String, message: String },

    /// Domain is already on the block list
    #[error("'{domain}' is already blocked")]
    DuplicateDomain { domain: String },

    /// Domain is not on the block list
    #[error("'{domain}' is not in the block list")]
    UnknownDomain { domain: String },

    /// Invalid value for a named field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Import-document errors.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Required top-level field is absent
    #[error("Import document is missing required field '{0}'")]
    MissingField(&'static str),

    /// Document is not parseable JSON
    #[error("Import document is not valid JSON: {0}")]
    Malformed(String),

    /// Caller did not confirm the import
    #[error("Import requires explicit confirmation")]
    NotConfirmed,
}

/// Network-filter rule errors.
#[derive(Error, Debug)]
pub enum FilterError {
    /// More rules than the removable id range can hold
    #[error("{count} rules exceed the installed-rule limit of {max}")]
    TooManyRules { count: usize, max: usize },

    /// Rule installation or removal failed
    #[error("Rule update failed: {0}")]
    UpdateFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for FilterError {
    fn from(err: rusqlite::Error) -> Self {
        FilterError::UpdateFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
