//! Error types for cmdbox operations

use std::io;
use thiserror::Error;

/// Result type for cmdbox operations
pub type Result<T> = std::result::Result<T, CmdboxError>;

/// Errors that can occur while launching or configuring commands
#[derive(Error, Debug)]
pub enum CmdboxError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to launch {program}: {reason}")]
    Launch { program: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
