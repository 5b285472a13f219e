//! Error types for DynamoDB operations.
//!
//! SDK errors are kept as-is so callers can match on the service's typed
//! exceptions.

use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use thiserror::Error;

/// Result type alias for tablekit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during table operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    Build(#[from] BuildError),

    #[error("CreateTable failed: {}", DisplayErrorContext(.0))]
    CreateTable(#[from] SdkError<CreateTableError, HttpResponse>),

    #[error("DescribeTable failed: {}", DisplayErrorContext(.0))]
    DescribeTable(#[from] SdkError<DescribeTableError, HttpResponse>),

    #[error("DeleteTable failed: {}", DisplayErrorContext(.0))]
    DeleteTable(#[from] SdkError<DeleteTableError, HttpResponse>),

    #[error("BatchWriteItem failed: {}", DisplayErrorContext(.0))]
    BatchWriteItem(#[from] SdkError<BatchWriteItemError, HttpResponse>),

    #[error("Scan failed: {}", DisplayErrorContext(.0))]
    Scan(#[from] SdkError<ScanError, HttpResponse>),

    #[error("Query failed: {}", DisplayErrorContext(.0))]
    Query(#[from] SdkError<QueryError, HttpResponse>),

    #[error("GetItem failed: {}", DisplayErrorContext(.0))]
    GetItem(#[from] SdkError<GetItemError, HttpResponse>),

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("Timeout waiting for table '{table_name}' to finish deleting")]
    TableDeletionTimeout { table_name: String },
}

impl Error {
    /// The service refused to create a table because it already exists.
    pub fn is_table_already_exists(&self) -> bool {
        match self {
            Error::CreateTable(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_in_use_exception()),
            _ => false,
        }
    }

    /// The operation targeted a table that does not exist.
    pub fn is_table_not_found(&self) -> bool {
        match self {
            Error::DescribeTable(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()),
            Error::DeleteTable(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()),
            Error::BatchWriteItem(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()),
            Error::Scan(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()),
            Error::Query(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()),
            Error::GetItem(err) => err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception()),
            _ => false,
        }
    }
}

/// Recognises a rejected conditional write on the raw SDK error.
pub trait ConditionalCheck {
    fn is_conditional_check_failed(&self) -> bool;
}

impl ConditionalCheck for SdkError<UpdateItemError, HttpResponse> {
    fn is_conditional_check_failed(&self) -> bool {
        self.as_service_error()
            .is_some_and(|e| e.is_conditional_check_failed_exception())
    }
}

impl ConditionalCheck for SdkError<PutItemError, HttpResponse> {
    fn is_conditional_check_failed(&self) -> bool {
        self.as_service_error()
            .is_some_and(|e| e.is_conditional_check_failed_exception())
    }
}

impl ConditionalCheck for SdkError<DeleteItemError, HttpResponse> {
    fn is_conditional_check_failed(&self) -> bool {
        self.as_service_error()
            .is_some_and(|e| e.is_conditional_check_failed_exception())
    }
}
