//! Error types for Character Catalog
//!
//! Errors are grouped by concern: `FetchError` covers everything between the
//! store and the remote API, `ConfigError` covers configuration loading, and
//! `AppError` is the top-level type returned to the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the catalog client and store
///
/// Transient failures (HTTP 429, transport errors) are retried inside the
/// client; by the time one of these reaches a caller the retry budget is spent.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Server kept answering HTTP 429 until the attempt budget ran out
    #[error("Rate limit exceeded after {attempts} attempts. Please try again later")]
    RateLimitExceeded { attempts: u32 },

    /// Transport-level failure (DNS, connect, reset, timeout, body read)
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server returned a terminal error status
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// Requested character does not exist
    #[error("Character {id} not found")]
    NotFound { id: u32 },

    /// Response body was not the expected JSON shape
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// URL could not be built from the configured base
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Build an `Http` error from a response status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Whether this error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format in {path}: {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// No per-user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// I/O error reading or writing the configuration file
    #[error("Configuration file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Client or store error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(FetchError::NotFound { .. }) => "not_found",
            AppError::Fetch(_) => "fetch",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Client and store result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
