//! Core error types for hunt-timer-core.
//!
//! Every failure in the core is absorbed close to where it happens: the
//! estimator returns [`InsufficientData`] as a value, and the session timer
//! logs [`StorageError`] and keeps running in memory. `CoreError` exists for
//! the places that do propagate, mostly configuration and store setup.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hunt-timer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence backend errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Estimator inputs were incomplete
    #[error("Insufficient data: {0}")]
    InsufficientData(#[from] InsufficientData),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The estimator could not produce a number from its inputs.
///
/// This is the "need more info" state, not a failure the user should see.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InsufficientData {
    #[error("drop probability must be a finite number in (0, 1], got {0}")]
    DropProbability(f64),

    #[error("kill rate must be a finite number greater than 0, got {0}")]
    KillRate(f64),

    #[error("experience per kill must be a finite number greater than 0, got {0}")]
    ExperiencePerKill(f64),

    #[error("experience gained must be a finite number of at least 0, got {0}")]
    ExperienceGained(f64),

    #[error("sampling window must be 1 or 5 minutes, got {0}")]
    SamplingWindow(u32),

    #[error("no whole kills observed in the sampling window")]
    NoKills,
}

/// Persistence-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored record could not be encoded or decoded
    #[error("Malformed record for '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the operation (in-memory backends, tests)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
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
