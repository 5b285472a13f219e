//! Create-table settings (Functional Core - pure data).

use serde::{Deserialize, Serialize};

use crate::schema::{
    add_secondary_index_attribute_definitions, generate_table_schema, AttributeDescriptor,
    SecondaryIndex, TableSchema,
};

/// Provisioned read/write capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read_capacity_units: 1,
            write_capacity_units: 1,
        }
    }
}

/// Everything a create-table call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    pub table_name: String,
    pub schema: TableSchema,
    pub stream_enabled: bool,
    pub throughput: Throughput,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub secondary_indexes: Vec<SecondaryIndex>,
}

impl TableSettings {
    /// Base configuration (streams off, 1/1 capacity) merged with the
    /// schema generated from `descriptors` and augmented with `indexes`.
    pub fn new(
        table_name: impl Into<String>,
        descriptors: &[AttributeDescriptor],
        indexes: &[SecondaryIndex],
    ) -> Self {
        Self {
            table_name: table_name.into(),
            schema: add_secondary_index_attribute_definitions(
                generate_table_schema(descriptors),
                indexes,
            ),
            stream_enabled: false,
            throughput: Throughput::default(),
            secondary_indexes: indexes.to_vec(),
        }
    }

    pub fn with_throughput(mut self, throughput: Throughput) -> Self {
        self.throughput = throughput;
        self
    }

    /// Pretty JSON rendering, used for logging.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Pure function: format the settings for display.
pub fn format_table_settings(settings: &TableSettings) -> Vec<String> {
    let mut lines = vec![format!("+ Create table: {}", settings.table_name)];
    for key in &settings.schema.key_schema {
        let attribute_type = settings
            .schema
            .attribute_definitions
            .iter()
            .find(|a| a.name == key.name)
            .map(|a| a.attribute_type.as_str())
            .unwrap_or("?");
        lines.push(format!(
            "  {} key: {} ({})",
            key.role.as_str(),
            key.name,
            attribute_type
        ));
    }
    for index in &settings.secondary_indexes {
        lines.push(format!("  + GSI: {}", index.name));
        for key in &index.key_schema {
            lines.push(format!(
                "    {} key: {} ({})",
                key.role.as_str(),
                key.name,
                key.attribute_type.as_str()
            ));
        }
    }
    lines.push(format!(
        "  Throughput: {} RCU / {} WCU",
        settings.throughput.read_capacity_units, settings.throughput.write_capacity_units
    ));
    lines
}
