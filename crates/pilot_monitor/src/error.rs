//! Error types for the monitor.

use thiserror::Error;

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors raised by invalid simulator settings.
#[derive(Error, Debug, PartialEq)]
pub enum MonitorError {
    #[error("Interval for {0} must be greater than zero")]
    ZeroInterval(String),

    #[error("Unknown pipeline agent: {0}")]
    UnknownAgent(String),

    #[error("Agent {agent} has no setting named {key}")]
    UnknownSetting { agent: String, key: String },

    #[error("Invalid value {value} for setting {key}: {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },
}
