use chrono::{DateTime, NaiveDateTime, Utc};
use model::{
    core::value::{FieldValue, Value},
    records::row::RowData,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use tokio_postgres::{
    Row,
    types::{FromSql, Type},
};
use tracing::warn;

/// Decodes a Postgres row into a `RowData`, keeping column order.
/// NULLs and values of unsupported types become absent fields.
pub fn to_row_data(row: &Row, entity: &str) -> RowData {
    let field_values = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| FieldValue::new(column.name(), decode(row, idx, column.type_())))
        .collect();

    RowData::new(entity, field_values)
}

fn decode(row: &Row, idx: usize, ty: &Type) -> Option<Value> {
    match *ty {
        Type::INT2 => get::<i16>(row, idx).map(|v| Value::Int(v as i64)),
        Type::INT4 => get::<i32>(row, idx).map(|v| Value::Int(v as i64)),
        Type::INT8 => get::<i64>(row, idx).map(Value::Int),
        Type::FLOAT4 => get::<f32>(row, idx).map(|v| Value::Float(v as f64)),
        Type::FLOAT8 => get::<f64>(row, idx).map(Value::Float),
        Type::NUMERIC => get::<Decimal>(row, idx)
            .and_then(|v| v.to_f64())
            .map(Value::Float),
        Type::BOOL => get::<bool>(row, idx).map(Value::Boolean),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            get::<String>(row, idx).map(Value::String)
        }
        Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, idx).map(Value::Timestamp),
        Type::TIMESTAMP => get::<NaiveDateTime>(row, idx).map(|v| Value::Timestamp(v.and_utc())),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx).map(Value::Json),
        _ => {
            warn!(column = row.columns()[idx].name(), pg_type = %ty, "Unsupported column type");
            None
        }
    }
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> Option<T> {
    match row.try_get::<_, Option<T>>(idx) {
        Ok(value) => value,
        Err(err) => {
            warn!(column = row.columns()[idx].name(), %err, "Failed to decode column");
            None
        }
    }
}
