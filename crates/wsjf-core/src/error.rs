//! Core error types for wsjf-core.
//!
//! This module defines the error hierarchy using thiserror so that the CLI
//! can surface every failure as a user-facing message.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wsjf-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected at the boundary (blank name, bad score)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Batch input file errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised before an initiative reaches the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty or whitespace
    #[error("Initiative name cannot be empty")]
    BlankName,

    /// Value outside the accepted input range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Unknown weight field name
    #[error("Unknown weight field '{0}' (expected one of: user_value, time_criticality, risk_reduction, compliance)")]
    UnknownWeightField(String),

    /// Fractional score or job size
    #[error("{field} must be a whole number, got {value}")]
    NotAnInteger { field: &'static str, value: f64 },
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

    /// Unknown dotted key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No config directory on this platform
    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// PDF report export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export
    #[error("No initiatives to export. Add at least one initiative first")]
    EmptyCollection,

    /// A previous export has not finished
    #[error("An export is already in progress")]
    InProgress,

    /// Font size must be a positive number of points
    #[error("Invalid report font size {0}: must be greater than 0")]
    InvalidFontSize(f32),

    /// The selected layout cannot render this report
    #[error("{layout} layout unavailable: {reason}")]
    LayoutUnavailable {
        layout: &'static str,
        reason: String,
    },

    /// The output location cannot receive a file
    #[error("Cannot write report to {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF encoding failed
    #[error("Failed to encode PDF: {0}")]
    Encode(String),
}

/// Batch input file errors.
#[derive(Error, Debug)]
pub enum InputError {
    /// Failed to read the file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unparseable file content
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Entry rejected by validation
    #[error("Initiative #{index} ('{name}') is invalid: {source}")]
    InvalidEntry {
        index: usize,
        name: String,
        #[source]
        source: ValidationError,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
