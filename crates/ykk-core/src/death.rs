//! The `deaths` resource: table definition, seed source and record variants.
//!
//! Rows are materialised into a [`Death`] and then wrapped in a
//! [`DeathRecord`], whose variant is picked from the `medium` column.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  registry::{Model, SeedSource},
  schema::TableDefinition,
  value::Row,
};

pub const TABLE: &str = "deaths";

/// File name of the seed document, relative to the data directory.
pub const SEED_FILE: &str = "deaths.json";

/// Id carried by records that have not been stored yet.
pub const UNSAVED_ID: i64 = -1;

/// The `medium` value that selects [`Variant::Television`].
pub const TELEVISION: &str = "Television";

// ─── Base record ─────────────────────────────────────────────────────────────

/// One death, as stored in the `deaths` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
  #[serde(default = "unsaved_id")]
  pub id:          i64,
  pub medium:      String,
  pub title:       String,
  pub description: String,
  pub image:       String,
  /// Set when the record was read back from storage.
  #[serde(skip)]
  pub stored:      bool,
}

fn unsaved_id() -> i64 { UNSAVED_ID }

impl Model for Death {
  fn tables() -> Vec<TableDefinition> {
    vec![TableDefinition::new(TABLE, [
      ("id", "INTEGER", "PRIMARY KEY AUTOINCREMENT"),
      ("medium", "TEXT", "NOT NULL"),
      ("title", "TEXT", "NOT NULL"),
      ("description", "TEXT", "NOT NULL"),
      ("image", "TEXT", "NOT NULL"),
    ])]
  }

  fn seeds(data_dir: &Path) -> Vec<SeedSource> {
    vec![SeedSource::new(TABLE, data_dir.join(SEED_FILE))]
  }
}

// ─── Variants ────────────────────────────────────────────────────────────────

/// The closed set of record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
  Television,
  Other,
}

impl Variant {
  pub fn for_medium(medium: &str) -> Self {
    match medium {
      TELEVISION => Self::Television,
      _ => Self::Other,
    }
  }
}

/// A television death; adds the season it aired in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelevisionDeath {
  #[serde(flatten)]
  pub death:  Death,
  pub season: String,
}

/// A death together with any variant-specific attributes.
///
/// Serialises flat: `{id, medium, title, description, image}` plus `season`
/// for television deaths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeathRecord {
  Television(TelevisionDeath),
  Other(Death),
}

impl DeathRecord {
  /// Wrap `death` in the variant its medium selects. `season` is only kept
  /// for television deaths.
  pub fn new(death: Death, season: Option<String>) -> Self {
    match Variant::for_medium(&death.medium) {
      Variant::Television => Self::Television(TelevisionDeath {
        death,
        season: season.unwrap_or_default(),
      }),
      Variant::Other => Self::Other(death),
    }
  }

  /// Build a stored record from a column-name → value object.
  ///
  /// Columns other than the declared ones are ignored, except `season`,
  /// which feeds the television variant when present.
  pub fn from_fields(mut fields: Map<String, Value>) -> Result<Self> {
    let season = match fields.remove("season") {
      Some(Value::String(s)) => Some(s),
      _ => None,
    };
    let mut death: Death = serde_json::from_value(Value::Object(fields))?;
    death.stored = true;
    Ok(Self::new(death, season))
  }

  pub fn variant(&self) -> Variant {
    match self {
      Self::Television(_) => Variant::Television,
      Self::Other(_) => Variant::Other,
    }
  }

  pub fn death(&self) -> &Death {
    match self {
      Self::Television(TelevisionDeath { death, .. }) | Self::Other(death) => death,
    }
  }

  pub fn to_json(&self) -> Result<Value> { Ok(serde_json::to_value(self)?) }
}

/// Pair declared `fields` positionally with a fetched `row`.
pub fn pair_fields(fields: &[String], row: Row) -> Result<Map<String, Value>> {
  if fields.len() != row.len() {
    return Err(Error::Schema(format!(
      "row has {} columns, table declares {}",
      row.len(),
      fields.len()
    )));
  }
  Ok(
    fields
      .iter()
      .cloned()
      .zip(row.into_iter().map(Value::from))
      .collect(),
  )
}

/// Convenience for callers holding a [`TableDefinition`] and a row.
pub fn record_from_row(def: &TableDefinition, row: Row) -> Result<DeathRecord> {
  DeathRecord::from_fields(pair_fields(&def.fields, row)?)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::value::FieldValue;

  fn row(medium: &str) -> Row {
    vec![
      FieldValue::Integer(4),
      FieldValue::from(medium),
      FieldValue::from("T1"),
      FieldValue::from("D1"),
      FieldValue::from("I1"),
    ]
  }

  fn table() -> TableDefinition { Death::tables().remove(0) }

  #[test]
  fn deaths_table_is_valid() {
    let def = table();
    def.validate().unwrap();
    assert_eq!(def.name, TABLE);
    assert_eq!(def.insert_columns(), &["medium", "title", "description", "image"]);
  }

  #[test]
  fn seed_path_uses_data_dir() {
    let seeds = Death::seeds(Path::new("data"));
    assert_eq!(seeds, vec![SeedSource::new("deaths", "data/deaths.json")]);
  }

  #[test]
  fn television_medium_selects_tv_variant() {
    let record = record_from_row(&table(), row("Television")).unwrap();
    assert_eq!(record.variant(), Variant::Television);
    assert!(record.death().stored);
    assert_eq!(
      record.to_json().unwrap(),
      json!({
        "id": 4, "medium": "Television", "title": "T1",
        "description": "D1", "image": "I1", "season": ""
      })
    );
  }

  #[test]
  fn other_medium_selects_base_shape() {
    let record = record_from_row(&table(), row("Film")).unwrap();
    assert_eq!(record.variant(), Variant::Other);
    assert_eq!(
      record.to_json().unwrap(),
      json!({
        "id": 4, "medium": "Film", "title": "T1",
        "description": "D1", "image": "I1"
      })
    );
  }

  #[test]
  fn season_is_kept_for_television_only() {
    let mut fields = pair_fields(&table().fields, row("Television")).unwrap();
    fields.insert("season".into(), json!("Season 5"));
    let tv = DeathRecord::from_fields(fields).unwrap();
    assert!(matches!(tv, DeathRecord::Television(ref t) if t.season == "Season 5"));

    let mut fields = pair_fields(&table().fields, row("Game")).unwrap();
    fields.insert("season".into(), json!("Season 5"));
    let game = DeathRecord::from_fields(fields).unwrap();
    assert!(game.to_json().unwrap().get("season").is_none());
  }

  #[test]
  fn width_mismatch_is_schema_error() {
    let mut short = row("Film");
    short.pop();
    assert!(matches!(record_from_row(&table(), short), Err(Error::Schema(_))));
  }
}
