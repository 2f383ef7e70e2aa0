//! Conversion between [`FieldValue`] and rusqlite's dynamic value type.

use rusqlite::types::Value;
use ykk_core::value::{FieldValue, Row};

pub fn encode_value(v: &FieldValue) -> Value {
  match v {
    FieldValue::Null => Value::Null,
    FieldValue::Integer(i) => Value::Integer(*i),
    FieldValue::Real(f) => Value::Real(*f),
    FieldValue::Text(s) => Value::Text(s.clone()),
  }
}

/// Blobs have no [`FieldValue`] form; they are decoded as lossy UTF-8 text.
pub fn decode_value(v: Value) -> FieldValue {
  match v {
    Value::Null => FieldValue::Null,
    Value::Integer(i) => FieldValue::Integer(i),
    Value::Real(f) => FieldValue::Real(f),
    Value::Text(s) => FieldValue::Text(s),
    Value::Blob(b) => FieldValue::Text(String::from_utf8_lossy(&b).into_owned()),
  }
}

/// Read every column of `row` in order.
pub fn decode_row(row: &rusqlite::Row<'_>, width: usize) -> rusqlite::Result<Row> {
  (0..width)
    .map(|i| row.get::<_, Value>(i).map(decode_value))
    .collect()
}
