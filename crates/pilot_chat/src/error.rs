//! Error types for the chat engine.
//!
//! Session operations never fail; invalid input is reported as an ignored
//! outcome instead. Errors only arise when loading configuration or files.

use thiserror::Error;

/// Chat system errors
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
