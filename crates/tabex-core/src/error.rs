//! Error types for export registration and execution.

use std::io;

use tabex_model::{ModelError, ResolveError};
use thiserror::Error;

/// Error type returned by scope callables.
pub type ScopeError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while registering schemas or running an export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// The registration block supplied an unusable configuration.
    #[error("invalid export configuration: {message}")]
    InvalidConfiguration { message: String },

    /// No schema is registered under this model name.
    #[error("unknown export model '{model}'")]
    UnresolvableModel { model: String },

    /// Neither the schema nor the request supplied a scope.
    #[error("no export scope configured for {model}")]
    ScopeNotConfigured { model: String },

    /// The scope callable failed.
    #[error("export scope for {model} failed: {source}")]
    Scope {
        model: String,
        #[source]
        source: ScopeError,
    },

    /// A cell failed with an error that is not recoverable.
    #[error("failed to resolve column '{header}' for row {row}: {source}")]
    Resolution {
        header: String,
        row: usize,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Table(#[from] ModelError),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
