//! DynamoDB table fixtures for integration tests.
//!
//! A [`Database`] handle wraps one configured SDK client. Through it a test
//! can set up a table, populate it, read it back and tear it down:
//!
//! ```no_run
//! # async fn run() -> tablekit::Result<()> {
//! use tablekit::{AttributeDescriptor, AwsConfig, Database, DEFAULT_LOCAL_ENDPOINT};
//!
//! let db = Database::connect(&AwsConfig::local(DEFAULT_LOCAL_ENDPOINT)).await;
//! let keys = [AttributeDescriptor::hash("PK"), AttributeDescriptor::range("SK")];
//!
//! db.setup("Users", &keys, &[]).await?;
//! let dump = db.dump("Users").await?;
//! assert_eq!(dump.count, 0);
//! db.teardown("Users").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Schema generation and request shaping live in [`tablekit_core`] and are
//! re-exported here.

pub mod client;
pub mod command;
pub mod convert;
pub mod error;
pub mod lifecycle;
pub mod query;

pub use client::{create_client, AwsConfig, Database, DEFAULT_LOCAL_ENDPOINT};
pub use command::Command;
pub use convert::{unmarshall, unmarshall_value, Item};
pub use error::{ConditionalCheck, Error, Result};
pub use lifecycle::{BatchWriteSummary, Deferred};
pub use query::Dump;

pub use tablekit_core;
pub use tablekit_core::{
    add_secondary_index_attribute_definitions, generate_batch_write_requests,
    generate_table_schema, put_requests, AttributeDescriptor, AttributeType,
    KeyRole, Projection, SecondaryIndex, TableSchema, TableSettings, Throughput, WriteOperation,
    WriteRequest,
};
