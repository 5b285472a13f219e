//! Table schema generation (Functional Core - pure data).
//!
//! Translates attribute descriptors into the attribute definitions and key
//! schema a create-table call expects. Nothing here performs I/O.

use serde::{Deserialize, Serialize};

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    #[serde(rename = "B")]
    Binary,
    #[serde(rename = "BOOL")]
    Boolean,
    #[serde(rename = "BS")]
    BinarySet,
    #[serde(rename = "L")]
    List,
    #[serde(rename = "M")]
    Map,
    #[serde(rename = "N")]
    Number,
    #[serde(rename = "NS")]
    NumberSet,
    #[serde(rename = "NULL")]
    Null,
    #[serde(rename = "S")]
    String,
    #[serde(rename = "SS")]
    StringSet,
}

impl AttributeType {
    /// Returns the wire tag of the type (`S`, `N`, `BOOL`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Binary => "B",
            AttributeType::Boolean => "BOOL",
            AttributeType::BinarySet => "BS",
            AttributeType::List => "L",
            AttributeType::Map => "M",
            AttributeType::Number => "N",
            AttributeType::NumberSet => "NS",
            AttributeType::Null => "NULL",
            AttributeType::String => "S",
            AttributeType::StringSet => "SS",
        }
    }
}

/// Role of an attribute inside a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyRole {
    /// Partition key.
    Hash,
    /// Sort key.
    Range,
}

impl KeyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyRole::Hash => "HASH",
            KeyRole::Range => "RANGE",
        }
    }
}

/// An attribute taking part in a key, with its type and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub attribute_type: AttributeType,
    pub role: KeyRole,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType, role: KeyRole) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            role,
        }
    }

    /// String partition key.
    pub fn hash(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String, KeyRole::Hash)
    }

    /// String sort key.
    pub fn range(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String, KeyRole::Range)
    }
}

/// One entry of `AttributeDefinitions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// One entry of `KeySchema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchemaElement {
    pub name: String,
    pub role: KeyRole,
}

/// The two structures a create-table call derives from the key descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
}

/// Which attributes a secondary index copies from the base table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    All,
    KeysOnly,
    Include(Vec<String>),
}

/// Global secondary index configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndex {
    pub name: String,
    pub key_schema: Vec<AttributeDescriptor>,
    pub projection: Projection,
}

impl SecondaryIndex {
    /// Creates an index projecting all attributes.
    pub fn new(name: impl Into<String>, key_schema: Vec<AttributeDescriptor>) -> Self {
        Self {
            name: name.into(),
            key_schema,
            projection: Projection::All,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Key schema entries of the index, in declaration order.
    pub fn key_schema_elements(&self) -> Vec<KeySchemaElement> {
        self.key_schema
            .iter()
            .map(|descriptor| KeySchemaElement {
                name: descriptor.name.clone(),
                role: descriptor.role,
            })
            .collect()
    }
}

/// Pure function: fold the descriptors into a [`TableSchema`].
///
/// One attribute definition and one key schema entry is appended per
/// descriptor, in input order. Role uniqueness is not checked.
pub fn generate_table_schema(descriptors: &[AttributeDescriptor]) -> TableSchema {
    descriptors
        .iter()
        .fold(TableSchema::default(), |mut schema, descriptor| {
            schema.attribute_definitions.push(AttributeDefinition {
                name: descriptor.name.clone(),
                attribute_type: descriptor.attribute_type,
            });
            schema.key_schema.push(KeySchemaElement {
                name: descriptor.name.clone(),
                role: descriptor.role,
            });
            schema
        })
}

/// Pure function: declare the key attributes of every secondary index.
///
/// Index key attributes are appended in index order, then key order. An
/// attribute that is already declared is skipped, since the service rejects
/// duplicate declarations. An empty index list returns the schema unchanged.
pub fn add_secondary_index_attribute_definitions(
    schema: TableSchema,
    indexes: &[SecondaryIndex],
) -> TableSchema {
    indexes
        .iter()
        .flat_map(|index| index.key_schema.iter())
        .fold(schema, |mut schema, descriptor| {
            let declared = schema
                .attribute_definitions
                .iter()
                .any(|a| a.name == descriptor.name);

            if !declared {
                schema.attribute_definitions.push(AttributeDefinition {
                    name: descriptor.name.clone(),
                    attribute_type: descriptor.attribute_type,
                });
            }
            schema
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_key() -> Vec<AttributeDescriptor> {
        vec![AttributeDescriptor::hash("PK"), AttributeDescriptor::range("SK")]
    }

    fn gsi1() -> SecondaryIndex {
        SecondaryIndex::new(
            "GSI1",
            vec![
                AttributeDescriptor::hash("GSI1PK"),
                AttributeDescriptor::new("GSI1SK", AttributeType::Number, KeyRole::Range),
            ],
        )
    }

    #[test]
    fn test_generate_table_schema_preserves_order() {
        let schema = generate_table_schema(&primary_key());

        let names: Vec<&str> = schema
            .attribute_definitions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["PK", "SK"]);

        let roles: Vec<KeyRole> = schema.key_schema.iter().map(|k| k.role).collect();
        assert_eq!(roles, vec![KeyRole::Hash, KeyRole::Range]);
    }

    #[test]
    fn test_generate_table_schema_keeps_types() {
        let schema = generate_table_schema(&[AttributeDescriptor::new(
            "row",
            AttributeType::Number,
            KeyRole::Hash,
        )]);

        assert_eq!(
            schema.attribute_definitions,
            vec![AttributeDefinition {
                name: "row".to_string(),
                attribute_type: AttributeType::Number,
            }]
        );
    }

    #[test]
    fn test_generate_table_schema_does_not_validate_roles() {
        let schema = generate_table_schema(&[
            AttributeDescriptor::hash("A"),
            AttributeDescriptor::hash("B"),
        ]);

        assert_eq!(schema.key_schema.len(), 2);
        assert!(schema.key_schema.iter().all(|k| k.role == KeyRole::Hash));
    }

    #[test]
    fn test_generate_table_schema_empty() {
        assert_eq!(generate_table_schema(&[]), TableSchema::default());
    }

    #[test]
    fn test_augment_without_indexes_is_identity() {
        let schema = generate_table_schema(&primary_key());
        assert_eq!(
            add_secondary_index_attribute_definitions(schema.clone(), &[]),
            schema
        );
    }

    #[test]
    fn test_augment_appends_index_keys_in_order() {
        let schema = add_secondary_index_attribute_definitions(
            generate_table_schema(&primary_key()),
            &[gsi1()],
        );

        let names: Vec<&str> = schema
            .attribute_definitions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["PK", "SK", "GSI1PK", "GSI1SK"]);
        assert_eq!(
            schema.attribute_definitions[3].attribute_type,
            AttributeType::Number
        );
        // Index keys never leak into the table key schema
        assert_eq!(schema.key_schema.len(), 2);
    }

    #[test]
    fn test_augment_skips_already_declared_attributes() {
        let inverted = SecondaryIndex::new(
            "Inverted",
            vec![AttributeDescriptor::hash("SK"), AttributeDescriptor::range("PK")],
        );

        let schema = add_secondary_index_attribute_definitions(
            generate_table_schema(&primary_key()),
            &[inverted, gsi1()],
        );

        let names: Vec<&str> = schema
            .attribute_definitions
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["PK", "SK", "GSI1PK", "GSI1SK"]);
    }

    #[test]
    fn test_secondary_index_key_schema_elements() {
        let elements = gsi1().key_schema_elements();
        assert_eq!(elements[0].name, "GSI1PK");
        assert_eq!(elements[0].role, KeyRole::Hash);
        assert_eq!(elements[1].role, KeyRole::Range);
    }

    #[test]
    fn test_attribute_type_serializes_to_wire_tag() {
        let json = serde_json::to_string(&AttributeType::StringSet).unwrap();
        assert_eq!(json, "\"SS\"");
        assert_eq!(AttributeType::Boolean.as_str(), "BOOL");
        assert_eq!(KeyRole::Range.as_str(), "RANGE");
    }
}
