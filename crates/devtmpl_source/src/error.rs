//! Error types for source resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while resolving a template source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("unrecognized template source: {0}")]
    InvalidSource(String),

    #[error("failed to fetch '{url}': {message}")]
    FetchFailed { url: String, message: String },

    #[error("invalid reference '{reference}': {message}")]
    InvalidReference { reference: String, message: String },

    #[error("failed to pull '{reference}': {message}")]
    PullFailed { reference: String, message: String },

    #[error("devcontainer-template.json not found in {0} or its subdirectories")]
    TemplateNotFound(PathBuf),

    #[error("failed to copy local directory '{path}': {message}")]
    CopyFailed { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Create a fetch failure error.
    pub fn fetch_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid reference error.
    pub fn invalid_reference(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a pull failure error.
    pub fn pull_failed(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PullFailed {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a local copy failure error.
    pub fn copy_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CopyFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
