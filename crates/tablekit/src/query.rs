//! Read facade: dump, scan, query and get.
//!
//! Scans and queries follow `LastEvaluatedKey` until the service reports no
//! more pages. The streaming variants fetch one page at a time as the caller
//! polls them.

use aws_sdk_dynamodb::operation::query::builders::QueryInputBuilder;
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::Database;
use crate::convert::{self, Item};
use crate::error::{Error, Result};

/// Every item of a table, unmarshalled, with the scan totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dump {
    pub count: usize,
    pub scanned_count: usize,
    pub items: Vec<Map<String, Value>>,
}

impl Database {
    /// Scan the whole table and unmarshall every item.
    pub async fn dump(&self, table_name: &str) -> Result<Dump> {
        let mut dump = Dump::default();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await?;

            dump.count += page_count(output.count());
            dump.scanned_count += page_count(output.scanned_count());
            dump.items
                .extend(output.items().iter().map(convert::unmarshall));

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table = %table_name, count = dump.count, "Table dumped");
        Ok(dump)
    }

    /// Lazily scan every item of the table.
    pub fn scan_items(&self, table_name: &str) -> BoxStream<'static, Result<Item>> {
        let client = self.client.clone();
        let table_name = table_name.to_string();

        Box::pin(async_stream::try_stream! {
            let mut start_key: Option<Item> = None;

            loop {
                let output = client
                    .scan()
                    .table_name(&table_name)
                    .set_exclusive_start_key(start_key.take())
                    .send()
                    .await
                    .map_err(Error::from)?;

                for item in output.items.unwrap_or_default() {
                    yield item;
                }

                match output.last_evaluated_key {
                    Some(key) if !key.is_empty() => start_key = Some(key),
                    _ => break,
                }
            }
        })
    }

    /// Lazily run `query` across every page of results.
    ///
    /// Any start key already set on `query` is used for the first page.
    pub fn query_items(&self, query: QueryInputBuilder) -> BoxStream<'static, Result<Item>> {
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            let mut start_key = query.get_exclusive_start_key().clone();

            loop {
                let output = query
                    .clone()
                    .set_exclusive_start_key(start_key.take())
                    .send_with(&client)
                    .await
                    .map_err(Error::from)?;

                for item in output.items.unwrap_or_default() {
                    yield item;
                }

                match output.last_evaluated_key {
                    Some(key) if !key.is_empty() => start_key = Some(key),
                    _ => break,
                }
            }
        })
    }

    /// Collect every page of `query`, unmarshalled.
    pub async fn query_all(&self, query: QueryInputBuilder) -> Result<Vec<Map<String, Value>>> {
        self.query_items(query)
            .map_ok(|item| convert::unmarshall(&item))
            .try_collect()
            .await
    }

    /// Fetch a single item by its full primary key.
    pub async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Map<String, Value>>> {
        let output = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await?;

        Ok(output.item().map(convert::unmarshall))
    }
}

fn page_count(count: i32) -> usize {
    usize::try_from(count).unwrap_or_default()
}
