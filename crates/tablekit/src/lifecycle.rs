//! Table lifecycle: setup, populate and teardown (Imperative Shell).
//!
//! Each public operation returns a deferred action. Nothing is sent to the
//! database until the returned future is awaited, so test harnesses can build
//! the actions up front and run them from their own before/after hooks.

use std::time::Duration;

use aws_sdk_dynamodb::operation::create_table::CreateTableOutput;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableOutput;
use aws_sdk_dynamodb::types::{IndexStatus, TableStatus};
use futures_util::future::BoxFuture;
use tablekit_core::{
    batch_count, format_table_settings, put_requests, AttributeDescriptor, SecondaryIndex,
    TableSettings, WriteRequest, MAX_BATCH_WRITE_REQUESTS,
};

use crate::client::Database;
use crate::convert::{self, Item};
use crate::error::{Error, Result};

/// A lifecycle action that runs when awaited.
pub type Deferred = BoxFuture<'static, Result<()>>;

const ACTIVATION_ATTEMPTS: u32 = 60;
const ACTIVATION_DELAY: Duration = Duration::from_millis(500);
/// Create-table calls `setup` makes against a table that is still being deleted.
pub const CREATE_ATTEMPTS: u32 = 3;

/// Outcome of a batch write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchWriteSummary {
    /// Requests sent to the service.
    pub requested: usize,
    /// Requests the service handed back without applying.
    pub unprocessed: usize,
}

impl Database {
    /// Create `table_name` with a key schema generated from `descriptors`
    /// plus the key attributes of `indexes`.
    ///
    /// A table that already exists is not an error: the action logs a
    /// warning and still waits for the table to become active. A table left
    /// in `DELETING` by an earlier teardown is created again once it is gone.
    pub fn setup(
        &self,
        table_name: &str,
        descriptors: &[AttributeDescriptor],
        indexes: &[SecondaryIndex],
    ) -> Deferred {
        let settings = TableSettings::new(table_name, descriptors, indexes);
        let db = self.clone();

        Box::pin(async move {
            tracing::debug!(settings = %settings.to_pretty_json(), "Creating table");
            db.create_table_if_absent(&settings).await?;
            Ok(())
        })
    }

    /// Put every item into `table_name`.
    ///
    /// Items the service leaves unprocessed are logged at warn and the action
    /// still resolves `Ok`. Call [`Database::batch_write_items`] directly to
    /// get a [`BatchWriteSummary`] with the unprocessed count.
    pub fn populate(&self, table_name: &str, items: Vec<Item>) -> Deferred {
        let table_name = table_name.to_string();
        let db = self.clone();

        Box::pin(async move {
            db.batch_write_items(&table_name, put_requests(items)).await?;
            Ok(())
        })
    }

    /// Delete `table_name`. Failures, including a missing table, propagate.
    pub fn teardown(&self, table_name: &str) -> Deferred {
        let table_name = table_name.to_string();
        let db = self.clone();

        Box::pin(async move {
            db.delete_table(&table_name).await?;
            Ok(())
        })
    }

    /// Create the table described by `settings` and wait until it is active.
    ///
    /// Returns `false` when the table was already there. A table that is still
    /// being deleted is waited out and created again, up to
    /// [`CREATE_ATTEMPTS`] times.
    pub async fn create_table_if_absent(&self, settings: &TableSettings) -> Result<bool> {
        self.create_table_if_absent_with(settings, ACTIVATION_ATTEMPTS, ACTIVATION_DELAY)
            .await
    }

    async fn create_table_if_absent_with(
        &self,
        settings: &TableSettings,
        attempts: u32,
        delay: Duration,
    ) -> Result<bool> {
        let table_name = &settings.table_name;
        let mut create_attempt = 1;

        let created = loop {
            let conflict = match self.create_table(settings).await {
                Ok(_) => {
                    for line in format_table_settings(settings) {
                        tracing::info!("{}", line);
                    }
                    break true;
                }
                Err(err) if err.is_table_already_exists() => err,
                Err(err) => return Err(err),
            };

            match self.table_state(table_name).await? {
                TableState::Creating | TableState::Active => {
                    tracing::warn!(table = %table_name, "Table already exists");
                    break false;
                }
                _ if create_attempt >= CREATE_ATTEMPTS => return Err(conflict),
                TableState::Deleting => {
                    tracing::info!(table = %table_name, "Table is being deleted, waiting to recreate it");
                    self.wait_for_table_deleted_with(table_name, attempts, delay)
                        .await?;
                }
                TableState::Missing => {}
            }
            create_attempt += 1;
        };

        self.wait_for_table_active_with(table_name, attempts, delay)
            .await?;
        Ok(created)
    }

    /// Issue a single create-table call.
    pub async fn create_table(&self, settings: &TableSettings) -> Result<CreateTableOutput> {
        let mut request = self
            .client
            .create_table()
            .table_name(&settings.table_name)
            .set_attribute_definitions(Some(convert::attribute_definitions(&settings.schema)?))
            .set_key_schema(Some(convert::key_schema(&settings.schema.key_schema)?))
            .stream_specification(convert::stream_specification(settings.stream_enabled)?)
            .provisioned_throughput(convert::provisioned_throughput(&settings.throughput)?);

        for index in &settings.secondary_indexes {
            request = request.global_secondary_indexes(convert::global_secondary_index(
                index,
                &settings.throughput,
            )?);
        }

        Ok(request.send().await?)
    }

    pub async fn delete_table(&self, table_name: &str) -> Result<DeleteTableOutput> {
        let output = self
            .client
            .delete_table()
            .table_name(table_name)
            .send()
            .await?;
        tracing::info!(table = %table_name, "Table deleted");
        Ok(output)
    }

    /// Send `requests` in batches of at most [`MAX_BATCH_WRITE_REQUESTS`].
    ///
    /// Items the service leaves unprocessed are counted and logged, not
    /// retried.
    pub async fn batch_write_items(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest<Item>>,
    ) -> Result<BatchWriteSummary> {
        let requests = requests
            .into_iter()
            .map(convert::write_request)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            table = %table_name,
            requests = requests.len(),
            batches = batch_count(requests.len()),
            "Writing batch"
        );
        let mut summary = BatchWriteSummary::default();

        for chunk in requests.chunks(MAX_BATCH_WRITE_REQUESTS) {
            let output = self
                .client
                .batch_write_item()
                .request_items(table_name, chunk.to_vec())
                .send()
                .await?;

            let unprocessed = output
                .unprocessed_items()
                .and_then(|items| items.get(table_name))
                .map_or(0, Vec::len);

            if unprocessed > 0 {
                tracing::warn!(table = %table_name, unprocessed, "Batch write left items unprocessed");
            }

            summary.requested += chunk.len();
            summary.unprocessed += unprocessed;
        }

        Ok(summary)
    }

    async fn wait_for_table_active_with(
        &self,
        table_name: &str,
        attempts: u32,
        delay: Duration,
    ) -> Result<()> {
        for _ in 0..attempts {
            if self.table_state(table_name).await? == TableState::Active {
                return Ok(());
            }
            tokio::time::sleep(delay).await;
        }

        Err(Error::TableActivationTimeout {
            table_name: table_name.to_string(),
        })
    }

    async fn wait_for_table_deleted_with(
        &self,
        table_name: &str,
        attempts: u32,
        delay: Duration,
    ) -> Result<()> {
        for _ in 0..attempts {
            if self.table_state(table_name).await? == TableState::Missing {
                return Ok(());
            }
            tokio::time::sleep(delay).await;
        }

        Err(Error::TableDeletionTimeout {
            table_name: table_name.to_string(),
        })
    }

    async fn table_state(&self, table_name: &str) -> Result<TableState> {
        let output = match self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let err = Error::from(err);
                return if err.is_table_not_found() {
                    Ok(TableState::Missing)
                } else {
                    Err(err)
                };
            }
        };

        let Some(table) = output.table() else {
            return Ok(TableState::Missing);
        };

        let indexes_active = table
            .global_secondary_indexes()
            .iter()
            .all(|index| index.index_status() == Some(&IndexStatus::Active));

        Ok(match table.table_status() {
            Some(TableStatus::Deleting) => TableState::Deleting,
            Some(TableStatus::Active) if indexes_active => TableState::Active,
            _ => TableState::Creating,
        })
    }
}

/// What describe-table reports for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    Missing,
    Deleting,
    /// Creating or updating, or active with an index still building.
    Creating,
    /// The table and all of its global secondary indexes are active.
    Active,
}
