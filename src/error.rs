//! Error types for SchemaBridge
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for SchemaBridge operations
///
/// Covers upload validation, model registry lookups, provider calls,
/// model output parsing, configuration and storage failures.
#[derive(Error, Debug)]
pub enum SchemaBridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, authentication, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Uploaded document was rejected (wrong extension or invalid JSON)
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// No model in the registry is marked active
    #[error("No active model configured")]
    NoActiveModel,

    /// The model reply could not be parsed as JSON after cleanup
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Model registry storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SchemaBridgeError {
    /// Whether the error was caused by the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidUpload(_))
    }
}

/// Result type alias for SchemaBridge operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
