//! Pure building blocks for DynamoDB test fixtures.
//!
//! Schema generation, secondary index augmentation and batch request
//! envelopes. No I/O happens in this crate; `tablekit` turns these values
//! into SDK requests.

pub mod batch;
pub mod schema;
pub mod settings;

pub use batch::{
    batch_count, generate_batch_write_requests, put_requests, WriteOperation, WriteRequest,
    MAX_BATCH_WRITE_REQUESTS,
};
pub use schema::{
    add_secondary_index_attribute_definitions, generate_table_schema, AttributeDefinition,
    AttributeDescriptor, AttributeType, KeyRole, KeySchemaElement, Projection, SecondaryIndex,
    TableSchema,
};
pub use settings::{format_table_settings, TableSettings, Throughput};
