//! Batch write request envelopes.

use serde::{Deserialize, Serialize};

/// Maximum number of write requests a single batch-write call accepts.
pub const MAX_BATCH_WRITE_REQUESTS: usize = 25;

/// Operation carried by a batch write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOperation {
    Put,
    Delete,
}

/// A single entry of a batch write.
///
/// For [`WriteOperation::Delete`] the item is the key of the item to remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest<I> {
    pub operation: WriteOperation,
    pub item: I,
}

impl<I> WriteRequest<I> {
    pub fn put(item: I) -> Self {
        Self {
            operation: WriteOperation::Put,
            item,
        }
    }

    pub fn delete(key: I) -> Self {
        Self {
            operation: WriteOperation::Delete,
            item: key,
        }
    }
}

impl<I> From<(WriteOperation, I)> for WriteRequest<I> {
    fn from((operation, item): (WriteOperation, I)) -> Self {
        Self { operation, item }
    }
}

/// Wrap every `(operation, item)` pair into a [`WriteRequest`], keeping order.
pub fn generate_batch_write_requests<I>(
    items: impl IntoIterator<Item = (WriteOperation, I)>,
) -> Vec<WriteRequest<I>> {
    items.into_iter().map(WriteRequest::from).collect()
}

/// Wrap every item into a put request, keeping order.
pub fn put_requests<I>(items: impl IntoIterator<Item = I>) -> Vec<WriteRequest<I>> {
    items.into_iter().map(WriteRequest::put).collect()
}

/// Number of batch-write calls needed for `requests` write requests.
pub fn batch_count(requests: usize) -> usize {
    requests.div_ceil(MAX_BATCH_WRITE_REQUESTS)
}
