//! Table maintenance commands: delete a table or dump its contents.

mod error;

pub use error::{DynamodbError, Result};

use tablekit::{AwsConfig, Database, Dump};

use crate::prelude::*;

/// Delete a table.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Delete a DynamoDB table and print the service response.

Fails if the table does not exist.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeleteDbCommand {
    /// Name of the table to delete.
    pub table_name: String,
}

/// Print every item of a table.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Scan a DynamoDB table and print its items as JSON.

Items are unmarshalled into plain JSON values. Every page of the scan is
followed, so the output holds the whole table.")]
pub struct DumpCommand {
    /// Name of the table to dump.
    pub table_name: String,
}

async fn connect(global: &crate::Global) -> Database {
    let aws_config = AwsConfig::default();

    if !global.is_silent() {
        aeprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aeprintln!();
    }

    Database::connect(&aws_config).await
}

pub async fn run_delete(command: DeleteDbCommand, global: crate::Global) -> Result<()> {
    let db = connect(&global).await;

    if !global.is_silent() {
        aeprintln!("{} {}", p_b("Deleting table"), p_y(&command.table_name));
    }

    let output = db.delete_table(&command.table_name).await?;

    aprintln!("{:#?}", output);
    if !global.is_silent() {
        aeprintln!("{}", p_g("Table deleted."));
    }

    Ok(())
}

/// Status lines go to stderr so stdout holds only the JSON document.
pub async fn run_dump(command: DumpCommand, global: crate::Global) -> Result<()> {
    let db = connect(&global).await;
    let dump = db.dump(&command.table_name).await?;

    aprintln!("{}", render_dump(&dump)?);
    if !global.is_silent() {
        aeprintln!(
            "{} {} items ({} scanned)",
            p_g("Done:"),
            dump.count,
            dump.scanned_count
        );
    }

    Ok(())
}

fn render_dump(dump: &Dump) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dump)
}
