use thiserror::Error;

/// Errors that can occur while managing containers.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Container runtime not found: {0}")]
    RuntimeNotFound(String),

    #[error("Failed to start container '{name}': {stderr}")]
    StartFailed { name: String, stderr: String },

    #[error("Container '{name}' is not healthy after {timeout_secs}s")]
    NotHealthy { name: String, timeout_secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
