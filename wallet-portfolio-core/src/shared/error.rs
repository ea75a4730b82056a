//! Error handling for the portfolio core
//!
//! This module defines the error types used throughout the portfolio core.
//! Missing addresses and empty inputs are not errors: they produce `None`
//! or empty views.

use thiserror::Error;

/// Portfolio error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token source error: {0}")]
    Source(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortfolioError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a token source error
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    /// Create an invariant violation error
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error signals a programming bug rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_) | Self::Internal(_))
    }
}

impl From<config::ConfigError> for PortfolioError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(format!("Config loading error: {}", err))
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("JSON error: {}", err))
    }
}

impl From<tokio::sync::AcquireError> for PortfolioError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        Self::internal(format!("Semaphore acquire error: {}", err))
    }
}
