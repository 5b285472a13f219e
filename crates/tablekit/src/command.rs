//! Pass-through for pre-built requests.
//!
//! [`Database::send`] submits any supported input builder unchanged and
//! hands back the raw SDK result. Errors are not wrapped, so callers can
//! inspect the service's typed exceptions directly.

use std::future::Future;

use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::builders::DeleteItemInputBuilder;
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemError, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::builders::GetItemInputBuilder;
use aws_sdk_dynamodb::operation::get_item::{GetItemError, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::builders::PutItemInputBuilder;
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::operation::query::builders::QueryInputBuilder;
use aws_sdk_dynamodb::operation::query::{QueryError, QueryOutput};
use aws_sdk_dynamodb::operation::scan::builders::ScanInputBuilder;
use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::builders::UpdateItemInputBuilder;
use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
use aws_sdk_dynamodb::Client;

use crate::client::Database;

/// A request that can be sent as-is.
pub trait Command {
    type Output;
    type Error;

    fn dispatch(
        self,
        client: &Client,
    ) -> impl Future<Output = Result<Self::Output, SdkError<Self::Error, HttpResponse>>> + Send;
}

macro_rules! impl_command {
    ($($builder:ty => $output:ty, $error:ty;)+) => {
        $(
            impl Command for $builder {
                type Output = $output;
                type Error = $error;

                fn dispatch(
                    self,
                    client: &Client,
                ) -> impl Future<Output = Result<Self::Output, SdkError<Self::Error, HttpResponse>>> + Send
                {
                    self.send_with(client)
                }
            }
        )+
    };
}

impl_command! {
    GetItemInputBuilder => GetItemOutput, GetItemError;
    PutItemInputBuilder => PutItemOutput, PutItemError;
    UpdateItemInputBuilder => UpdateItemOutput, UpdateItemError;
    DeleteItemInputBuilder => DeleteItemOutput, DeleteItemError;
    QueryInputBuilder => QueryOutput, QueryError;
    ScanInputBuilder => ScanOutput, ScanError;
}

impl Database {
    /// Submit `command` and return the raw result.
    pub async fn send<C: Command>(
        &self,
        command: C,
    ) -> Result<C::Output, SdkError<C::Error, HttpResponse>> {
        command.dispatch(&self.client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::operation::put_item::PutItemInput;
    use aws_sdk_dynamodb::operation::update_item::UpdateItemInput;
    use aws_sdk_dynamodb::types::error::ConditionalCheckFailedException;
    use aws_sdk_dynamodb::types::AttributeValue;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    use crate::error::ConditionalCheck;

    fn increment(pk: &str) -> UpdateItemInputBuilder {
        UpdateItemInput::builder()
            .table_name("Table")
            .key("PK", AttributeValue::S(pk.to_string()))
            .key("SK", AttributeValue::S(pk.to_string()))
            .update_expression("SET #count = #count + :inc")
            .condition_expression("#count < :max")
            .expression_attribute_names("#count", "count")
            .expression_attribute_values(":inc", AttributeValue::N("1".to_string()))
            .expression_attribute_values(":max", AttributeValue::N("3".to_string()))
    }

    #[tokio::test]
    async fn test_send_passes_request_through() {
        let put = mock!(Client::put_item)
            .match_requests(|req| {
                req.table_name() == Some("Table")
                    && req.condition_expression() == Some("attribute_not_exists(PK)")
            })
            .then_output(|| PutItemOutput::builder().build());
        let db = Database::new(mock_client!(
            aws_sdk_dynamodb,
            RuleMode::Sequential,
            &[&put]
        ));

        let request = PutItemInput::builder()
            .table_name("Table")
            .item("PK", AttributeValue::S("u1".to_string()))
            .condition_expression("attribute_not_exists(PK)");
        db.send(request).await.unwrap();

        assert_eq!(put.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_send_surfaces_conditional_check_failure() {
        let update = mock!(Client::update_item).then_error(|| {
            UpdateItemError::ConditionalCheckFailedException(
                ConditionalCheckFailedException::builder()
                    .message("The conditional request failed")
                    .build(),
            )
        });
        let db = Database::new(mock_client!(
            aws_sdk_dynamodb,
            RuleMode::Sequential,
            &[&update]
        ));

        let err = db.send(increment("u1")).await.unwrap_err();

        assert!(err.is_conditional_check_failed());
    }
}
