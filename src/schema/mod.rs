//! Schema registry
//!
//! Each record kind is declared as an ordered table of [`Property`]
//! descriptors. The tables are rendered to JSON Schema for SCHEMA messages
//! and discovery, and used to validate outgoing records.

mod property;
mod registry;

pub use property::{Property, PropertyType};
pub use registry::{CONFIG_SCHEMA, PRODUCTS_SCHEMA, SUBSCRIPTIONS_SCHEMA, SchemaRegistry};

use serde_json::{Map, Value, json};
use thiserror::Error;

/// Record failed validation against its schema
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("required field '{field}' is missing or null")]
    MissingRequired { field: &'static str },
    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: PropertyType,
        found: String,
    },
}

/// Ordered field-descriptor table for one record kind
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    properties: &'static [Property],
}

impl Schema {
    pub const fn new(properties: &'static [Property]) -> Self {
        Self { properties }
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &'static [Property] {
        self.properties
    }

    /// Look up a property by field name
    pub fn property(&self, name: &str) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Names of the required properties, in declaration order
    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
    }

    /// Render as a JSON Schema object
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|p| (p.name.to_string(), p.to_json_schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        let required: Vec<&str> = self.required().collect();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }
        Value::Object(schema)
    }

    /// Validate a record against this schema
    ///
    /// Absent optional fields are accepted; fields not declared in the
    /// schema are ignored here (see `RecordConformer`).
    pub fn validate(&self, record: &Value) -> Result<(), SchemaError> {
        let record = record.as_object().ok_or(SchemaError::NotAnObject)?;

        for property in self.properties {
            match record.get(property.name) {
                None | Some(Value::Null) if property.required => {
                    return Err(SchemaError::MissingRequired {
                        field: property.name,
                    });
                }
                None => {}
                Some(Value::Null) if property.nullable => {}
                Some(value) if property.kind.accepts(value) => {}
                Some(value) => {
                    return Err(SchemaError::TypeMismatch {
                        field: property.name,
                        expected: property.kind,
                        found: describe(value),
                    });
                }
            }
        }

        Ok(())
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
