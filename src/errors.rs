// src/errors.rs

//! Crate-wide error type and helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("line {seq} exceeds the maximum length of {limit} bytes")]
    LineTooLong { seq: u64, limit: usize },

    #[error("failed to create process for command {seq} ('{program}'): {source}")]
    Spawn {
        seq: u64,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("output file {path:?} unavailable: {source}")]
    OutputFiles {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for child {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RunnerError {
    /// Exit status the runner should terminate with when this error aborts
    /// the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Spawn { .. } => exit_codes::SPAWN_FAILED,
            _ => exit_codes::INVALID,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
