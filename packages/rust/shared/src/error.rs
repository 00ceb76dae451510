//! Error types for the résumé wizard.
//!
//! Library crates use [`CvWizardError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all wizard operations.
#[derive(Debug, thiserror::Error)]
pub enum CvWizardError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport failure: connection refused, timeout, body read error.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    ///
    /// `message` is already composed for display to the user.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Response body was not the JSON shape we expected.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Required user input missing or malformed.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// An operation was refused before any network call was made.
    #[error("precondition failed: {message}")]
    Precondition { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CvWizardError>;

impl CvWizardError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a precondition error from any displayable message.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    /// Create a rejection error carrying the HTTP status.
    pub fn rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The message a user should see for this error.
    ///
    /// Rejections and precondition failures carry their own text; transport
    /// and parse failures collapse to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Precondition { message } | Self::Validation { message } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
