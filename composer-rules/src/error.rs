//! Error types for rule configuration.

use thiserror::Error;

/// Result type for rule setup.
pub type RulesResult<T> = Result<T, RulesError>;

/// Errors raised while building the rule set.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A banned-copy pattern is not a valid regular expression.
    #[error("Invalid banned copy pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration JSON could not be parsed.
    #[error("Invalid rule configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
