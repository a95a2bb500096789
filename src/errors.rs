// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Compilation failures never show up here: they are reported as
//! [`crate::pipeline::Diagnostic`] values and swallowed by the pipeline. This
//! enum only covers setup problems that end the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("Initialization failed: {0}")]
    InitFailed(String),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
