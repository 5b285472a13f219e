//! Error types for integration test operations.

use thiserror::Error;

use crate::containers::ContainerError;

/// Result type alias for integration module.
pub type Result<T> = std::result::Result<T, IntegrationError>;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error("Test execution failed: {0}")]
    TestFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
