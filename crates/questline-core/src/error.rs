//! Core error types for questline-core.
//!
//! This module defines the error hierarchy using thiserror. Sync-specific
//! errors live in [`crate::sync::types::SyncError`]; everything else is here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for questline-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sync-related errors
    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Local entity store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Snapshot file could not be read or written
    #[error("Failed to access snapshot at {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file contained invalid JSON
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(#[from] serde_json::Error),

    /// Referenced entity does not exist
    #[error("Unknown {kind} id: {id}")]
    UnknownEntity { kind: &'static str, id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be written
    #[error("Failed to write config at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing failed
    #[error("Invalid config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Completion toggle applied to an entity already in that state
    #[error("Entity {id} is already {state}")]
    AlreadyInState { id: String, state: &'static str },
}
