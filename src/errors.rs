// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Cyclic dependency between targets: {0}")]
    DependencyCycle(String),

    #[error("Target '{target}' failed: {source}")]
    TargetFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Command `{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildError>;
