//! Error types for tomato-core.
//!
//! The phase engine itself never fails; these errors come from the
//! collaborators around it (storage, settings editing, task validation and
//! audio playback).

use std::path::PathBuf;
use thiserror::Error;

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),

    /// Value could not be encoded before writing
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration and settings errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Invalid value for a known key
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Task validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task content is blank after trimming
    #[error("Task content must not be empty")]
    EmptyContent,

    /// Task content exceeds the length limit
    #[error("Task content is {len} characters, the limit is {max}")]
    TooLong { len: usize, max: usize },

    /// No task with the given id
    #[error("No task with id '{0}'")]
    TaskNotFound(String),
}

/// Audio cue playback errors. Always recoverable.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Sound name contains characters outside `[A-Za-z0-9_-]`
    #[error("Invalid sound name: '{0}'")]
    InvalidName(String),

    /// Sound file does not exist
    #[error("Sound file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Sound file could not be read or decoded
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// No usable output device or stream
    #[error("Audio output failed: {0}")]
    Output(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}
