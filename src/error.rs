use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for appship operations
#[derive(Error, Debug)]
pub enum AppshipError {
    #[error("Invalid version string: {0}")]
    Version(String),

    #[error("Dirty working tree: uncommitted git changes")]
    DirtyWorkingTree,

    #[error("Command failed: {command} (exit code {code}) - output is in {}", log.display())]
    CommandFailed {
        command: String,
        code: i32,
        log: PathBuf,
    },

    #[error("App Store Connect unavailable: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in appship
pub type Result<T> = std::result::Result<T, AppshipError>;

impl AppshipError {
    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        AppshipError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        AppshipError::Remote(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AppshipError::Config(msg.into())
    }
}
