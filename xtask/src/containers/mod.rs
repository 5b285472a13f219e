//! Container management for DynamoDB Local.
//!
//! Follows the Functional Core - Imperative Shell pattern:
//!
//! - **Pure functions** build command arguments and environment variables.
//! - **I/O functions** execute container commands and poll for health.

mod error;

pub use error::{ContainerError, Result};

use std::future::Future;
use std::time::Duration;

use tokio::process::Command;

// ============================================================================
// Types
// ============================================================================

/// Container runtime (Docker or Podman).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerRuntime {
    #[default]
    Docker,
    Podman,
}

/// Specification for a container.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub name: &'static str,
    pub image: &'static str,
    pub port: u16,
    pub command: Option<&'static str>,
    /// HTTP status the service answers `GET /` with once it is up.
    pub healthy_status: u16,
}

/// DynamoDB Local container specification.
///
/// Runs in memory: every container start is a fresh database.
pub const DYNAMODB_SPEC: ContainerSpec = ContainerSpec {
    name: "tablekit-dynamodb",
    image: "amazon/dynamodb-local:latest",
    port: 8000,
    command: Some("-jar DynamoDBLocal.jar -sharedDb -inMemory"),
    healthy_status: 400,
};

// ============================================================================
// Pure Functions (Functional Core)
// ============================================================================

/// Builds arguments for `docker run` / `podman run`.
pub fn container_run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--name".to_string(),
        spec.name.to_string(),
        "-d".to_string(),
        "-p".to_string(),
        format!("{}:{}", spec.port, spec.port),
        spec.image.to_string(),
    ];

    if let Some(cmd) = spec.command {
        args.extend(cmd.split_whitespace().map(String::from));
    }

    args
}

/// Endpoint URL the host reaches the container on.
pub fn endpoint_url(spec: &ContainerSpec) -> String {
    format!("http://localhost:{}", spec.port)
}

/// Environment for processes talking to DynamoDB Local at `endpoint`.
pub fn environment_variables(endpoint: &str) -> Vec<(&'static str, String)> {
    vec![
        ("AWS_ENDPOINT_URL", endpoint.to_string()),
        ("AWS_REGION", "us-east-1".to_string()),
        ("AWS_ACCESS_KEY_ID", "test".to_string()),
        ("AWS_SECRET_ACCESS_KEY", "test".to_string()),
    ]
}

/// Returns the command name for the container runtime.
pub fn runtime_command(runtime: ContainerRuntime) -> &'static str {
    match runtime {
        ContainerRuntime::Docker => "docker",
        ContainerRuntime::Podman => "podman",
    }
}

// ============================================================================
// I/O Functions (Imperative Shell)
// ============================================================================

/// Detects which container runtime is available, Docker first.
pub async fn detect_runtime() -> Result<ContainerRuntime> {
    for runtime in [ContainerRuntime::Docker, ContainerRuntime::Podman] {
        let output = Command::new(runtime_command(runtime))
            .arg("--version")
            .output()
            .await;

        if let Ok(output) = output {
            if output.status.success() {
                tracing::debug!(runtime = runtime_command(runtime), "Container runtime found");
                return Ok(runtime);
            }
        }
    }

    Err(ContainerError::RuntimeNotFound(
        "Neither docker nor podman found in PATH".to_string(),
    ))
}

/// Whether a container named `name` is currently running.
pub async fn is_running(runtime: ContainerRuntime, name: &str) -> Result<bool> {
    let output = Command::new(runtime_command(runtime))
        .args(["ps", "-q", "-f", &format!("name={}", name)])
        .output()
        .await?;

    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

/// Stops and removes a container.
///
/// Errors are ignored since the container might not exist.
pub async fn stop_container(runtime: ContainerRuntime, name: &str) -> Result<()> {
    let cmd = runtime_command(runtime);

    let _ = Command::new(cmd).args(["stop", name]).output().await;
    let _ = Command::new(cmd).args(["rm", name]).output().await;

    Ok(())
}

/// Starts a container, replacing any stopped one with the same name.
pub async fn start_container(runtime: ContainerRuntime, spec: &ContainerSpec) -> Result<()> {
    stop_container(runtime, spec.name).await?;

    let args = container_run_args(spec);
    tracing::debug!(args = ?args, "Starting container");

    let output = Command::new(runtime_command(runtime))
        .args(&args)
        .output()
        .await?;

    if !output.status.success() {
        return Err(ContainerError::StartFailed {
            name: spec.name.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Starts a container and waits until it is healthy.
///
/// A container that never becomes healthy is stopped before the error is
/// returned.
pub async fn start_healthy(
    runtime: ContainerRuntime,
    spec: &ContainerSpec,
    timeout: Duration,
) -> Result<()> {
    start_container(runtime, spec).await?;
    stop_on_error(
        wait_for_health(spec, timeout).await,
        stop_container(runtime, spec.name),
    )
    .await
}

async fn stop_on_error<T>(result: Result<T>, stop: impl Future<Output = Result<()>>) -> Result<T> {
    if let Err(err) = &result {
        tracing::warn!(error = %err, "Stopping container");
        if let Err(stop_err) = stop.await {
            tracing::warn!(error = %stop_err, "Failed to stop container");
        }
    }
    result
}

/// Polls the container's HTTP endpoint until it answers or `timeout` passes.
pub async fn wait_for_health(spec: &ContainerSpec, timeout: Duration) -> Result<()> {
    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(500);

    while start.elapsed() < timeout {
        if check_http_health(spec.port, spec.healthy_status).await {
            return Ok(());
        }
        tokio::time::sleep(poll_interval).await;
    }

    Err(ContainerError::NotHealthy {
        name: spec.name.to_string(),
        timeout_secs: timeout.as_secs(),
    })
}

/// DynamoDB Local answers a bare `GET /` with 400 once it is serving.
async fn check_http_health(port: u16, expected_status: u16) -> bool {
    let url = format!("http://localhost:{}/", port);
    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
    else {
        return false;
    };

    match client.get(&url).send().await {
        Ok(response) => response.status().as_u16() == expected_status,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_unhealthy_container_is_stopped() {
        let stopped = AtomicBool::new(false);
        let unhealthy: Result<()> = Err(ContainerError::NotHealthy {
            name: DYNAMODB_SPEC.name.to_string(),
            timeout_secs: 30,
        });

        let result = stop_on_error(unhealthy, async {
            stopped.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ContainerError::NotHealthy { .. })));
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_healthy_container_keeps_running() {
        let stopped = AtomicBool::new(false);

        let result = stop_on_error(Ok(()), async {
            stopped.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(result.is_ok());
        assert!(!stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_container_run_args() {
        let args = container_run_args(&DYNAMODB_SPEC);

        assert_eq!(&args[..3], ["run", "--name", "tablekit-dynamodb"]);
        assert!(args.contains(&"8000:8000".to_string()));
        assert!(args.contains(&"amazon/dynamodb-local:latest".to_string()));
        assert!(args.contains(&"-inMemory".to_string()));
        assert!(!args.contains(&"-v".to_string()));
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url(&DYNAMODB_SPEC), "http://localhost:8000");
    }

    #[test]
    fn test_environment_variables() {
        let vars = environment_variables("http://localhost:8000");

        assert!(vars.contains(&("AWS_ENDPOINT_URL", "http://localhost:8000".to_string())));
        assert!(vars.contains(&("AWS_REGION", "us-east-1".to_string())));
        assert!(vars.contains(&("AWS_ACCESS_KEY_ID", "test".to_string())));
        assert!(vars.contains(&("AWS_SECRET_ACCESS_KEY", "test".to_string())));
    }

    #[test]
    fn test_runtime_command() {
        assert_eq!(runtime_command(ContainerRuntime::Docker), "docker");
        assert_eq!(runtime_command(ContainerRuntime::Podman), "podman");
    }
}
