//! Result and error types for dom-assert.

use thiserror::Error;

/// Result type for dom-assert operations
pub type SelectResult<T> = Result<T, SelectError>;

/// Errors that can occur while resolving or asserting a selector
#[derive(Debug, Error)]
pub enum SelectError {
    /// Malformed call shape (missing selector, stray argument, nil root, ...)
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// The selector engine rejected the selector string
    #[error("Invalid selector {selector:?}: {message}")]
    SelectorSyntax {
        /// Selector as handed to the engine
        selector: String,
        /// Error message from the engine
        message: String,
    },

    /// Count, text or html constraint not met
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

impl SelectError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether this error is an assertion failure rather than a usage error
    #[must_use]
    pub const fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }

    /// The human-readable message without the category prefix
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidArgument { message } | Self::AssertionFailed { message } => {
                message.clone()
            }
            Self::SelectorSyntax { message, .. } => message.clone(),
            Self::Config(err) => err.to_string(),
        }
    }
}
