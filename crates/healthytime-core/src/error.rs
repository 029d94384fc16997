//! Core error types for healthytime-core.
//!
//! The timer and record logic itself cannot fail; these errors cover the
//! edges where user text or the filesystem comes in.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for healthytime-core.
#[derive(Error, Debug)]
pub enum CoreError {
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

    /// TOML encoding errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
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

    /// Key does not exist in the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors for user-supplied text.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown meal type '{0}' (expected breakfast, lunch, snack, dinner or late-night)")]
    UnknownMealType(String),

    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    #[error("invalid time '{0}' (expected HH:MM or RFC 3339)")]
    InvalidTime(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
