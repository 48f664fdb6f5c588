//! Error types for the recovery_core library.

use chrono::{DateTime, Utc};
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for recovery_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The quit date lies after the reference instant
    #[error("Quit date {quit_at} is in the future (now is {now})")]
    InvalidCessationDate {
        quit_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// Usage profile is malformed (unknown category, negative or non-numeric field)
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Timeline range or step is unusable
    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),

    /// Metric registry validation error
    #[error("Registry validation error: {0}")]
    RegistryValidation(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
