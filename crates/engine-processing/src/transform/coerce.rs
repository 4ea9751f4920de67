//! Per-field coercions from loosely typed column values.

use chrono::{DateTime, Utc};
use model::core::value::Value;

/// Numeric fields: anything absent, non-numeric or non-finite becomes 0.0.
pub fn coerce_number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

/// Anomaly flag, always 0.0 or 1.0.
pub fn coerce_anomaly(value: &Value) -> f64 {
    if let Some(flag) = value.as_bool() {
        return if flag { 1.0 } else { 0.0 };
    }

    match value.as_f64() {
        Some(n) if n != 0.0 => 1.0,
        _ => 0.0,
    }
}

/// Event time, falling back to `now` when missing or unreadable.
pub fn coerce_timestamp(value: &Value, now: DateTime<Utc>) -> DateTime<Utc> {
    value.as_timestamp().unwrap_or(now)
}

pub fn coerce_device_id(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    value.as_string().unwrap_or_default()
}
