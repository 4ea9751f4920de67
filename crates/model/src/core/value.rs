use crate::core::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single column value as decoded from the source table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    /// Numeric view of the value. Strings are trimmed and parsed,
    /// booleans and timestamps are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        let parsed = match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::String(v) => v.trim().parse::<f64>().ok(),
            Value::Json(v) => match v {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            },
            Value::Boolean(_) => None,
            Value::Timestamp(_) => None,
            Value::Null => None,
        };

        parsed.filter(|v| v.is_finite())
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(v.to_string()),
            Value::Json(v) => match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            },
            Value::Timestamp(v) => Some(time::format_millis(v)),
            Value::Null => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            Value::Json(serde_json::Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Timestamp view of the value. Accepts native timestamps and
    /// strings in RFC 3339 or `YYYY-MM-DD hh:mm:ss[.fff]` (read as UTC).
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::String(s) => time::parse_utc(s),
            Value::Json(serde_json::Value::String(s)) => time::parse_utc(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Json(serde_json::Value::Null))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<Value>,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        FieldValue {
            name: name.into(),
            value,
        }
    }
}
