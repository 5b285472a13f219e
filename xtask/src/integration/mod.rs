//! Live test-suite runner.
//!
//! # Usage
//!
//! ```bash
//! # Start DynamoDB Local, run the scenarios, stop the container
//! cargo xtask integration
//!
//! # Reuse an already running DynamoDB Local
//! cargo xtask integration --no-docker
//!
//! # Leave the container running for inspection
//! cargo xtask integration --keep-container
//! ```

pub mod error;

pub use error::{IntegrationError, Result};

use std::time::Duration;

use crate::containers::{self, ContainerRuntime, DYNAMODB_SPEC};
use crate::prelude::*;

/// Integration test command.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Run the tablekit scenarios against DynamoDB Local.

Starts a DynamoDB Local container, runs `cargo test -p tablekit --features
integration` against it and stops the container afterward.

Environment variables:
  AWS_ENDPOINT_URL    - Override the DynamoDB endpoint with --no-docker
                        (default: http://localhost:8000)")]
pub struct IntegrationCommand {
    /// Skip container management (assume DynamoDB Local is already running).
    #[arg(long)]
    pub no_docker: bool,

    /// Keep the container running after tests complete.
    #[arg(long)]
    pub keep_container: bool,

    /// Timeout in seconds for the container health check.
    #[arg(long, default_value = "30")]
    pub health_timeout: u64,

    /// Extra arguments passed to `cargo test` (e.g. a test name filter).
    #[arg(last = true)]
    pub test_args: Vec<String>,
}

/// Main entry point for integration command.
pub async fn run(command: IntegrationCommand, global: crate::Global) -> Result<()> {
    if !global.is_silent() {
        aprintln!("{}", p_b("Integration Tests"));
        aprintln!();
    }

    let endpoint = if command.no_docker {
        std::env::var("AWS_ENDPOINT_URL").unwrap_or_else(|_| containers::endpoint_url(&DYNAMODB_SPEC))
    } else {
        containers::endpoint_url(&DYNAMODB_SPEC)
    };

    let runtime = if command.no_docker {
        if !global.is_silent() {
            aprintln!(
                "{} Skipping container management (--no-docker), using {}",
                p_y("⚠️"),
                endpoint
            );
        }
        None
    } else {
        Some(containers::detect_runtime().await?)
    };

    let started = match runtime {
        Some(rt) => start_dynamodb_container(rt, command.health_timeout, &global).await?,
        None => false,
    };

    let passed = run_tests(&endpoint, &command.test_args, &global).await;

    if let Some(rt) = runtime {
        if started && !command.keep_container {
            stop_dynamodb_container(rt, &global).await?;
        } else if started && !global.is_silent() {
            aprintln!("{} Container left running (--keep-container)", p_y("⚠️"));
        }
    }

    aprintln!();
    if passed? {
        aprintln!("{} {}", p_g("✅"), p_g("All integration tests passed!"));
        Ok(())
    } else {
        aprintln!("{} {}", p_r("❌"), p_r("Some integration tests failed"));
        Err(IntegrationError::TestFailed(
            "cargo test exited with a failure status".to_string(),
        ))
    }
}

/// Run the feature-gated scenarios. Returns whether they passed.
async fn run_tests(endpoint: &str, test_args: &[String], global: &crate::Global) -> Result<bool> {
    if !global.is_silent() {
        aprintln!("{} {}", p_b("🔧"), p_b("Running tablekit scenarios..."));
    }

    let mut cmd = tokio::process::Command::new("cargo");
    cmd.args(["test", "-p", "tablekit", "--features", "integration"]);
    if !test_args.is_empty() {
        cmd.arg("--").args(test_args);
    }
    cmd.envs(containers::environment_variables(endpoint));

    tracing::debug!(endpoint, "Running cargo test");
    let status = cmd.status().await?;

    Ok(status.success())
}

/// Start DynamoDB Local. Returns `false` if it was already running.
async fn start_dynamodb_container(
    runtime: ContainerRuntime,
    timeout_secs: u64,
    global: &crate::Global,
) -> Result<bool> {
    if containers::is_running(runtime, DYNAMODB_SPEC.name).await? {
        if !global.is_silent() {
            aprintln!("{} DynamoDB Local container already running", p_y("⚠️"));
        }
        return Ok(false);
    }

    if !global.is_silent() {
        aprintln!("{} Starting DynamoDB Local container...", p_b("🐳"));
    }

    if !global.is_silent() {
        aprintln!(
            "{} Waiting for container health (max {}s)...",
            p_b("⏳"),
            timeout_secs
        );
    }

    containers::start_healthy(runtime, &DYNAMODB_SPEC, Duration::from_secs(timeout_secs)).await?;

    if !global.is_silent() {
        aprintln!("{} DynamoDB Local is ready", p_g("✅"));
    }

    Ok(true)
}

async fn stop_dynamodb_container(runtime: ContainerRuntime, global: &crate::Global) -> Result<()> {
    if !global.is_silent() {
        aprintln!("{} Stopping DynamoDB Local container...", p_b("🐳"));
    }

    containers::stop_container(runtime, DYNAMODB_SPEC.name).await?;

    if !global.is_silent() {
        aprintln!("{} DynamoDB Local container stopped", p_g("✅"));
    }

    Ok(())
}
