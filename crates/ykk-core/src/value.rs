//! Scalar column values, rows and equality filters.

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result, schema::validate_identifier};

/// One scalar column value as stored in or read from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

/// An ordered tuple of column values.
pub type Row = Vec<FieldValue>;

impl FieldValue {
  /// Coerce a JSON scalar into a column value. Arrays and objects have no
  /// scalar form and return `None`.
  pub fn from_json(value: &Value) -> Option<Self> {
    match value {
      Value::Null => Some(Self::Null),
      Value::Bool(b) => Some(Self::Integer(i64::from(*b))),
      Value::Number(n) => n
        .as_i64()
        .map(Self::Integer)
        .or_else(|| n.as_f64().map(Self::Real)),
      Value::String(s) => Some(Self::Text(s.clone())),
      Value::Array(_) | Value::Object(_) => None,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl From<FieldValue> for Value {
  fn from(v: FieldValue) -> Self {
    match v {
      FieldValue::Null => Value::Null,
      FieldValue::Integer(i) => Value::from(i),
      FieldValue::Real(f) => Value::from(f),
      FieldValue::Text(s) => Value::String(s),
    }
  }
}

impl From<i64> for FieldValue {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

impl From<f64> for FieldValue {
  fn from(f: f64) -> Self { Self::Real(f) }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// A conjunction of `column = value` conditions for `fetch_all`.
///
/// Values are always bound as statement parameters; only column names are
/// rendered into SQL, and those are checked with [`Filter::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
  pub conditions: Vec<(String, FieldValue)>,
}

impl Filter {
  pub fn new() -> Self { Self::default() }

  /// Add a `column = value` condition.
  pub fn eq(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
    self.conditions.push((column.into(), value.into()));
    self
  }

  pub fn is_empty(&self) -> bool { self.conditions.is_empty() }

  pub fn validate(&self) -> Result<()> {
    for (column, _) in &self.conditions {
      validate_identifier(column)?;
    }
    Ok(())
  }

  /// Render the `WHERE` clause body, e.g. `medium = ? AND title = ?`.
  ///
  /// Returns [`Error::Schema`] if any column is not a plain identifier.
  pub fn to_sql(&self) -> Result<String> {
    self.validate()?;
    if self.is_empty() {
      return Err(Error::Schema("empty filter has no WHERE clause".into()));
    }
    Ok(
      self
        .conditions
        .iter()
        .map(|(column, _)| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(" AND "),
    )
  }

  /// The bound values, in the same order as [`Filter::to_sql`] placeholders.
  pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
    self.conditions.iter().map(|(_, v)| v)
  }
}
