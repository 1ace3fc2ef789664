//! Error types for template materialization.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::TemplateManifest;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template materialization.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("error reading devcontainer-template.json in {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing devcontainer-template.json in {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No legal devcontainer configuration layout was found. The manifest,
    /// when it parsed, rides along so discovery-only callers can still
    /// inspect it.
    #[error("no .devcontainer.json or .devcontainer/devcontainer.json found in {path}")]
    ConfigurationNotFound {
        path: PathBuf,
        manifest: Option<Box<TemplateManifest>>,
    },

    #[error("template has no options defined, but got options: {0:?}")]
    UnexpectedOptions(Vec<String>),

    #[error("option '{name}' is not defined in template (available options: {available:?})")]
    UnknownOption {
        name: String,
        available: Vec<String>,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to copy '{path}': {message}")]
    CopyFailed { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Source(#[from] devtmpl_source::SourceError),
}

impl TemplateError {
    /// Create a copy/remove failure error.
    pub fn copy_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CopyFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
