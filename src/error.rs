//! Error types for quake-glance.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for quake-glance operations.
#[derive(Error, Debug)]
pub enum GlanceError {
    /// Database connection errors (host unreachable, auth failed, no endpoint configured).
    #[error("Connection error: {0}")]
    Connection(String),

    /// A label was requested that the query catalog does not contain.
    #[error("Unknown query: {0}")]
    UnknownLabel(String),

    /// Query execution errors (syntax errors, type mismatches, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal failures, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GlanceError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an unknown-label error for the given label.
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel(label.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::UnknownLabel(_) => "Unknown Query",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using GlanceError.
pub type Result<T> = std::result::Result<T, GlanceError>;
