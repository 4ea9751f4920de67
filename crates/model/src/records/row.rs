use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// A raw source row: an ordered list of named, possibly absent values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    /// Column lookup is case-insensitive (`AccelMagnitude` == `accelmagnitude`).
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// Builder used by fixtures and row decoders.
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.field_values.push(FieldValue::new(name, Some(value)));
        self
    }
}
