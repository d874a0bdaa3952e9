//! Error types for poison-demo.
//!
//! Every error aborts the run; `main` reports the first one and exits.

use thiserror::Error;

/// Main error type for poison-demo operations.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Corpus or other file I/O failures.
    #[error("{0}")]
    Io(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("{0}")]
    Connection(String),

    /// Statement execution and row scanning errors.
    #[error("{0}")]
    Query(String),

    /// Fixture sampling errors (pool bound larger than a corpus, etc.)
    #[error("{0}")]
    Fixture(String),

    /// Configuration errors (invalid config file, bad connection string, etc.)
    #[error("{0}")]
    Config(String),

    /// Payload decoding errors (poison record not valid base64).
    #[error("{0}")]
    Decode(String),
}

impl DemoError {
    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a fixture error with the given message.
    pub fn fixture(msg: impl Into<String>) -> Self {
        Self::Fixture(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Returns the error category, printed before the message in `main`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "I/O Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Fixture(_) => "Fixture Error",
            Self::Config(_) => "Configuration Error",
            Self::Decode(_) => "Decode Error",
        }
    }
}

/// Result type alias using DemoError.
pub type Result<T> = std::result::Result<T, DemoError>;
