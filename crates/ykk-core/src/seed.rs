//! Seed loading: JSON documents to insertable rows.
//!
//! A seed document is a JSON array of flat objects. [`rows_for`] lines each
//! object up with a table's declared field order (primary key excluded), so
//! the resulting rows can be bound directly as `INSERT` parameters.

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  registry::SeedSource,
  schema::TableDefinition,
  value::{FieldValue, Row},
};

/// One flat object from a seed document.
pub type SeedRecord = Map<String, Value>;

/// Read and parse the document behind `source`.
pub fn load_seed(source: &SeedSource) -> Result<Vec<SeedRecord>> {
  let text = std::fs::read_to_string(&source.path).map_err(|e| Error::SeedRead {
    path:   source.path.clone(),
    source: e,
  })?;
  parse_seed(&source.path.display().to_string(), &text)
}

/// Parse seed text. `origin` names the document in error messages.
pub fn parse_seed(origin: &str, text: &str) -> Result<Vec<SeedRecord>> {
  let malformed = |reason: String| Error::MalformedSeed {
    origin: origin.to_owned(),
    reason,
  };

  let document: Value =
    serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

  let items = match document {
    Value::Array(items) => items,
    other => {
      return Err(malformed(format!(
        "top-level value is {}, expected an array",
        kind_of(&other)
      )));
    }
  };

  items
    .into_iter()
    .enumerate()
    .map(|(i, item)| match item {
      Value::Object(record) => Ok(record),
      other => Err(malformed(format!(
        "record {i} is {}, expected an object",
        kind_of(&other)
      ))),
    })
    .collect()
}

/// Shape `records` into rows ordered like `def.insert_columns()`.
///
/// Any `id` in a record is ignored; the database assigns one.
pub fn rows_for(def: &TableDefinition, records: &[SeedRecord]) -> Result<Vec<Row>> {
  let columns = def.insert_columns();

  records
    .iter()
    .enumerate()
    .map(|(i, record)| {
      columns
        .iter()
        .map(|field| {
          let value = record.get(field).ok_or_else(|| Error::MissingField {
            table:  def.name.clone(),
            field:  field.clone(),
            record: i,
          })?;
          FieldValue::from_json(value).ok_or_else(|| Error::MalformedSeed {
            origin: def.name.clone(),
            reason: format!(
              "record {i} field {field:?} is {}, expected a scalar",
              kind_of(value)
            ),
          })
        })
        .collect::<Result<Row>>()
    })
    .collect()
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
