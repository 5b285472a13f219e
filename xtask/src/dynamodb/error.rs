//! Error types for the table commands.

use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error(transparent)]
    Table(#[from] tablekit::Error),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
