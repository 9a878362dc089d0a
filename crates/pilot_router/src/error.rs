//! Error types for the router.

use thiserror::Error;

/// Result type alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors that can occur while building a router.
///
/// Routing itself never fails; these only surface when custom rules are loaded.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Invalid routing pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown agent category: {0}")]
    UnknownCategory(String),

    #[error("Rule configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
