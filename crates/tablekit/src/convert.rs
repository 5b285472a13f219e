//! Conversions between tablekit values and SDK types.
//!
//! Pure functions: core schema values become SDK request shapes, and SDK
//! attribute values are unmarshalled into plain JSON values. Testable without
//! DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{
    self as sdk, AttributeValue, DeleteRequest, GlobalSecondaryIndex, KeyType, ProjectionType,
    ProvisionedThroughput, PutRequest, ScalarAttributeType, StreamSpecification,
};
use base64::Engine;
use serde_json::{Map, Number, Value};
use tablekit_core::{
    KeyRole, KeySchemaElement, Projection, SecondaryIndex, TableSchema, Throughput,
    WriteOperation, WriteRequest,
};

use crate::error::Result;

/// An item as the SDK represents it.
pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Schema conversions
// ============================================================================

/// Attribute definitions of the schema, in order.
///
/// Types other than `S`, `N` and `B` are passed through and left for the
/// service to reject.
pub fn attribute_definitions(schema: &TableSchema) -> Result<Vec<sdk::AttributeDefinition>> {
    schema
        .attribute_definitions
        .iter()
        .map(|definition| {
            Ok(sdk::AttributeDefinition::builder()
                .attribute_name(&definition.name)
                .attribute_type(ScalarAttributeType::from(definition.attribute_type.as_str()))
                .build()?)
        })
        .collect()
}

/// Key schema elements, in order.
pub fn key_schema(elements: &[KeySchemaElement]) -> Result<Vec<sdk::KeySchemaElement>> {
    elements
        .iter()
        .map(|element| {
            Ok(sdk::KeySchemaElement::builder()
                .attribute_name(&element.name)
                .key_type(to_key_type(element.role))
                .build()?)
        })
        .collect()
}

pub fn provisioned_throughput(throughput: &Throughput) -> Result<ProvisionedThroughput> {
    Ok(ProvisionedThroughput::builder()
        .read_capacity_units(throughput.read_capacity_units)
        .write_capacity_units(throughput.write_capacity_units)
        .build()?)
}

pub fn stream_specification(enabled: bool) -> Result<StreamSpecification> {
    Ok(StreamSpecification::builder()
        .stream_enabled(enabled)
        .build()?)
}

pub fn projection(projection: &Projection) -> sdk::Projection {
    match projection {
        Projection::All => sdk::Projection::builder()
            .projection_type(ProjectionType::All)
            .build(),
        Projection::KeysOnly => sdk::Projection::builder()
            .projection_type(ProjectionType::KeysOnly)
            .build(),
        Projection::Include(attributes) => sdk::Projection::builder()
            .projection_type(ProjectionType::Include)
            .set_non_key_attributes(Some(attributes.clone()))
            .build(),
    }
}

/// A global secondary index, provisioned with the table's throughput.
pub fn global_secondary_index(
    index: &SecondaryIndex,
    throughput: &Throughput,
) -> Result<GlobalSecondaryIndex> {
    Ok(GlobalSecondaryIndex::builder()
        .index_name(&index.name)
        .set_key_schema(Some(key_schema(&index.key_schema_elements())?))
        .projection(projection(&index.projection))
        .provisioned_throughput(provisioned_throughput(throughput)?)
        .build()?)
}

fn to_key_type(role: KeyRole) -> KeyType {
    match role {
        KeyRole::Hash => KeyType::Hash,
        KeyRole::Range => KeyType::Range,
    }
}

// ============================================================================
// Write requests
// ============================================================================

/// Convert a write request envelope into the SDK shape.
pub fn write_request(request: WriteRequest<Item>) -> Result<sdk::WriteRequest> {
    let builder = sdk::WriteRequest::builder();
    let builder = match request.operation {
        WriteOperation::Put => {
            builder.put_request(PutRequest::builder().set_item(Some(request.item)).build()?)
        }
        WriteOperation::Delete => {
            builder.delete_request(DeleteRequest::builder().set_key(Some(request.item)).build()?)
        }
    };
    Ok(builder.build())
}

// ============================================================================
// Unmarshalling
// ============================================================================

/// Convert a DynamoDB item into a plain JSON object.
pub fn unmarshall(item: &Item) -> Map<String, Value> {
    item.iter()
        .map(|(name, value)| (name.clone(), unmarshall_value(value)))
        .collect()
}

/// Convert a single attribute value into its native JSON form.
///
/// Numbers become JSON integers when they fit an `i64`, floats otherwise;
/// binary values are base64 encoded; sets become arrays.
pub fn unmarshall_value(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => Value::String(encode(blob.as_ref())),
        AttributeValue::L(list) => Value::Array(list.iter().map(unmarshall_value).collect()),
        AttributeValue::M(map) => Value::Object(unmarshall(map)),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(set.iter().map(|n| number(n.as_str())).collect()),
        AttributeValue::Bs(set) => Value::Array(
            set.iter()
                .map(|blob| Value::String(encode(blob.as_ref())))
                .collect(),
        ),
        _ => Value::Null,
    }
}

/// An `i64`, else an `f64` that keeps every significant digit, else the text.
fn number(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|float| significant_digits(&float.to_string()) == significant_digits(raw))
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Mantissa digits without sign, point, exponent or surrounding zeros.
fn significant_digits(number: &str) -> String {
    let mantissa = number.split(['e', 'E']).next().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits
        .trim_start_matches('0')
        .trim_end_matches('0')
        .to_string()
}

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use serde_json::json;
    use tablekit_core::{generate_table_schema, AttributeDescriptor, AttributeType};

    fn sample_item() -> Item {
        HashMap::from([
            ("PK".to_string(), AttributeValue::S("USER#smilingbig".into())),
            ("count".to_string(), AttributeValue::N("2".into())),
            ("ratio".to_string(), AttributeValue::N("0.5".into())),
            (
                "list".to_string(),
                AttributeValue::L(vec![
                    AttributeValue::S("a".into()),
                    AttributeValue::S("b".into()),
                ]),
            ),
            (
                "meta".to_string(),
                AttributeValue::M(HashMap::from([(
                    "active".to_string(),
                    AttributeValue::Bool(true),
                )])),
            ),
            ("missing".to_string(), AttributeValue::Null(true)),
        ])
    }

    #[test]
    fn test_unmarshall_item() {
        let plain = unmarshall(&sample_item());

        assert_eq!(plain["PK"], json!("USER#smilingbig"));
        assert_eq!(plain["count"], json!(2));
        assert_eq!(plain["ratio"], json!(0.5));
        assert_eq!(plain["list"], json!(["a", "b"]));
        assert_eq!(plain["meta"], json!({ "active": true }));
        assert_eq!(plain["missing"], Value::Null);
    }

    #[test]
    fn test_unmarshall_sets_and_binary() {
        assert_eq!(
            unmarshall_value(&AttributeValue::Ss(vec!["x".into(), "y".into()])),
            json!(["x", "y"])
        );
        assert_eq!(
            unmarshall_value(&AttributeValue::Ns(vec!["1".into(), "2.5".into()])),
            json!([1, 2.5])
        );
        assert_eq!(
            unmarshall_value(&AttributeValue::B(Blob::new(b"hi".to_vec()))),
            json!("aGk=")
        );
    }

    #[test]
    fn test_unmarshall_number_out_of_range_keeps_text() {
        assert_eq!(number("1e400"), json!("1e400"));
        assert_eq!(number("9223372036854775807"), json!(i64::MAX));
    }

    #[test]
    fn test_unmarshall_number_beyond_f64_precision_keeps_text() {
        let wide = "123456789012345678901234567890";
        assert_eq!(number(wide), json!(wide));
        assert_eq!(number("0.12345678901234567890123"), json!("0.12345678901234567890123"));

        assert_eq!(number("0.5"), json!(0.5));
        assert_eq!(number("-2.50"), json!(-2.5));
        assert_eq!(number("1.5e3"), json!(1500.0));
    }

    #[test]
    fn test_attribute_definitions_and_key_schema() {
        let schema = generate_table_schema(&[
            AttributeDescriptor::hash("PK"),
            AttributeDescriptor::new("SK", AttributeType::Number, tablekit_core::KeyRole::Range),
        ]);

        let definitions = attribute_definitions(&schema).unwrap();
        assert_eq!(definitions[0].attribute_name(), "PK");
        assert_eq!(definitions[0].attribute_type(), &ScalarAttributeType::S);
        assert_eq!(definitions[1].attribute_type(), &ScalarAttributeType::N);

        let keys = key_schema(&schema.key_schema).unwrap();
        assert_eq!(keys[0].key_type(), &KeyType::Hash);
        assert_eq!(keys[1].attribute_name(), "SK");
        assert_eq!(keys[1].key_type(), &KeyType::Range);
    }

    #[test]
    fn test_global_secondary_index() {
        let index = SecondaryIndex::new(
            "GSI1",
            vec![AttributeDescriptor::hash("GSI1PK"), AttributeDescriptor::range("GSI1SK")],
        )
        .with_projection(Projection::Include(vec!["Name".to_string()]));

        let gsi = global_secondary_index(&index, &Throughput::default()).unwrap();
        assert_eq!(gsi.index_name(), "GSI1");
        assert_eq!(gsi.key_schema().len(), 2);
        let projection = gsi.projection().unwrap();
        assert_eq!(projection.projection_type(), Some(&ProjectionType::Include));
        assert_eq!(projection.non_key_attributes(), ["Name".to_string()]);
        assert!(gsi.provisioned_throughput().is_some());
    }

    #[test]
    fn test_write_request_put_and_delete() {
        let put = write_request(WriteRequest::put(sample_item())).unwrap();
        assert!(put.put_request().is_some());
        assert!(put.delete_request().is_none());

        let key = HashMap::from([("PK".to_string(), AttributeValue::S("u1".into()))]);
        let delete = write_request(WriteRequest::delete(key)).unwrap();
        assert!(delete.put_request().is_none());
        assert!(delete.delete_request().is_some());
    }
}
