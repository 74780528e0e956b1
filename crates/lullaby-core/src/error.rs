//! Core error types for lullaby-core.
//!
//! This module defines the error hierarchy using thiserror. Nothing in the
//! night program engine is fatal; these errors surface from assessment
//! validation, storage adapters and configuration handling.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lullaby-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A night program operation was refused
    #[error("Rejected: {0}")]
    Rejected(#[from] LogRejection),
}

/// Reasons a morning log is refused. The program state is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogRejection {
    /// A log for this calendar date already exists
    #[error("a morning log for {0} was already submitted")]
    AlreadyLogged(chrono::NaiveDate),

    /// The program is not active
    #[error("the night program is not active")]
    Inactive,

    /// Parent mood must be 1..=5
    #[error("parent mood must be between 1 and 5, got {0}")]
    InvalidMood(u8),
}

/// Errors raised by a persistence adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),

    /// Stored value could not be (de)serialized
    #[error("Malformed value under '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors for parent-entered data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required set of answers was empty
    #[error("'{0}' requires at least one answer")]
    EmptySelection(&'static str),

    /// A required text field was blank
    #[error("'{0}' must not be blank")]
    Blank(&'static str),

    /// A numeric answer fell outside its allowed range
    #[error("'{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// A time-of-day string was not HH:MM
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidClockTime(String),

    /// An answer tag was not recognized
    #[error("unknown {kind} '{value}'")]
    UnknownTag { kind: &'static str, value: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
