//! Error handling for JANA output processing.
//!
//! Only structurally fatal conditions are errors: missing files and
//! directories, unknown datasets, and table assembly/export failures.
//! Malformed rows and tokens inside a file are skipped by the parsers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JanaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Working directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("No dataset loaded under key '{key}'")]
    DatasetNotFound { key: String },

    #[error("Dataset '{key}' has no classified reflections; run classification first")]
    NotClassified { key: String },

    #[error("Dataset '{key}' has no reflection data")]
    NoReflections { key: String },

    #[error("Refusing to export into {path}: it holds the working directory")]
    UnsafeExportPath { path: PathBuf },

    #[error("Invalid file pattern '{pattern}': {reason}")]
    Glob { pattern: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl JanaError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JanaError>;
