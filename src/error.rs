use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for incremental operations
#[derive(Error, Debug)]
pub enum IncrementalError {
    #[error("Incomparable versions: {left:?} != {right:?}")]
    Incomparable { left: String, right: String },

    #[error("Invalid version: {0}")]
    InvalidConstruction(String),

    #[error("Invalid combination: --{first} cannot be used with --{second}")]
    InvalidCombination {
        first: &'static str,
        second: &'static str,
    },

    #[error(
        "Can't find package '{package}' under '{}' or '{}'. Check the package name is right \
         (note that the directory is expected to be lower cased), or pass it using '--path'.",
        src_candidate.display(),
        plain_candidate.display()
    )]
    PackageNotFound {
        package: String,
        src_candidate: PathBuf,
        plain_candidate: PathBuf,
    },

    #[error("No version file found at '{}'", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("You need to issue a prerelease first!")]
    NoPrerelease,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in incremental
pub type Result<T> = std::result::Result<T, IncrementalError>;

impl IncrementalError {
    /// Create a construction error with context
    pub fn invalid(msg: impl Into<String>) -> Self {
        IncrementalError::InvalidConstruction(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        IncrementalError::Config(msg.into())
    }
}
