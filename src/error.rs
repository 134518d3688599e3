// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for outlogger
//!
//! None of these ever reach the caller of an intercepted entry point.
//! The logging path reports them as diagnostics and carries on.

use thiserror::Error;

/// Result type alias for outlogger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for outlogger
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed in the default transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A body chunk could not be decoded into bytes
    #[error("Invalid body chunk: {0}")]
    Chunk(String),

    /// An entry point could not be patched or restored
    #[error("Installation failed: {0}")]
    Install(String),

    /// Transport-level failure outside reqwest (no runtime, handle ended twice)
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new chunk error
    pub fn chunk<S: Into<String>>(msg: S) -> Self {
        Error::Chunk(msg.into())
    }

    /// Create a new installation error
    pub fn install<S: Into<String>>(msg: S) -> Self {
        Error::Install(msg.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_))
    }
}
