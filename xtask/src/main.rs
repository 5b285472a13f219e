//! See <https://github.com/matklad/cargo-xtask/>
//!
//! This binary defines various auxiliary commands, which are not
//! expressible with just `cargo`.
//!
//! The binary is integrated into the `cargo` command line by using an
//! alias in `.cargo/config`.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod containers;
mod dynamodb;
mod integration;
mod prelude;

/// Development tasks for the tablekit repository
#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for tablekit", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence the command output
    #[clap(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[clap(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Filter used when `RUST_LOG` is not set.
    fn default_log_filter(&self) -> &'static str {
        if self.is_verbose() {
            "tablekit=debug,xtask=debug"
        } else if self.is_silent() {
            "tablekit=error,xtask=error"
        } else {
            "tablekit=info,xtask=info"
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Delete a DynamoDB table
    DeleteDb(dynamodb::DeleteDbCommand),

    /// Print every item of a DynamoDB table as JSON
    Dump(dynamodb::DumpCommand),

    /// Run the live scenarios against DynamoDB Local
    Integration(integration::IntegrationCommand),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.global.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::DeleteDb(delete_cmd) => {
            dynamodb::run_delete(delete_cmd, cli.global).await?;
        }
        Commands::Dump(dump_cmd) => {
            dynamodb::run_dump(dump_cmd, cli.global).await?;
        }
        Commands::Integration(integration_cmd) => {
            integration::run(integration_cmd, cli.global).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delete_db() {
        let cli = Cli::try_parse_from(["xtask", "delete-db", "Users"]).unwrap();

        match cli.command {
            Commands::DeleteDb(cmd) => assert_eq!(cmd.table_name, "Users"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_delete_db_requires_table_name() {
        assert!(Cli::try_parse_from(["xtask", "delete-db"]).is_err());
    }

    #[test]
    fn test_parse_integration_flags() {
        let cli = Cli::try_parse_from([
            "xtask",
            "integration",
            "--no-docker",
            "--keep-container",
            "--",
            "test_setup",
        ])
        .unwrap();

        match cli.command {
            Commands::Integration(cmd) => {
                assert!(cmd.no_docker);
                assert!(cmd.keep_container);
                assert_eq!(cmd.health_timeout, 30);
                assert_eq!(cmd.test_args, ["test_setup"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_log_filter() {
        let cli = Cli::try_parse_from(["xtask", "--verbose", "dump", "Users"]).unwrap();
        assert_eq!(cli.global.default_log_filter(), "tablekit=debug,xtask=debug");

        let cli = Cli::try_parse_from(["xtask", "dump", "Users"]).unwrap();
        assert_eq!(cli.global.default_log_filter(), "tablekit=info,xtask=info");
    }
}
