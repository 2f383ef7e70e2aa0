//! Table definitions contributed by model modules.
//!
//! A [`TableDefinition`] is three positionally aligned lists (fields, types,
//! constraints). Table and field names end up interpolated into DDL and DML,
//! so [`TableDefinition::validate`] restricts them to plain identifiers before
//! any statement is built.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Schema description for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
  pub name:          String,
  /// Column names; `fields[0]` is the primary key.
  pub fields:        Vec<String>,
  /// SQL column types, aligned with `fields`.
  pub types:         Vec<String>,
  /// Column constraints, aligned with `fields`. May be empty strings.
  pub constraints:   Vec<String>,
  #[serde(default)]
  pub without_rowid: bool,
}

impl TableDefinition {
  /// Build a definition from `(field, type, constraint)` triples.
  pub fn new<'a>(
    name: impl Into<String>,
    columns: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
  ) -> Self {
    let mut def = Self {
      name:          name.into(),
      fields:        Vec::new(),
      types:         Vec::new(),
      constraints:   Vec::new(),
      without_rowid: false,
    };
    for (field, ty, constraint) in columns {
      def.fields.push(field.to_owned());
      def.types.push(ty.to_owned());
      def.constraints.push(constraint.to_owned());
    }
    def
  }

  /// The primary key column, by convention the first field.
  pub fn primary_key(&self) -> &str {
    self.fields.first().map(String::as_str).unwrap_or("id")
  }

  /// Every column except the primary key, in declaration order. These are
  /// the columns a seed row supplies.
  pub fn insert_columns(&self) -> &[String] {
    self.fields.get(1..).unwrap_or_default()
  }

  /// Reject a definition that cannot be rendered into a well-formed
  /// `CREATE TABLE` statement.
  pub fn validate(&self) -> Result<()> {
    validate_identifier(&self.name)?;

    if self.fields.is_empty() {
      return Err(Error::Schema(format!("table {:?} declares no fields", self.name)));
    }
    if self.fields.len() != self.types.len()
      || self.fields.len() != self.constraints.len()
    {
      return Err(Error::Schema(format!(
        "table {:?}: {} fields, {} types, {} constraints",
        self.name,
        self.fields.len(),
        self.types.len(),
        self.constraints.len(),
      )));
    }

    let mut seen = HashSet::new();
    for field in &self.fields {
      validate_identifier(field)?;
      if !seen.insert(field.as_str()) {
        return Err(Error::Schema(format!(
          "table {:?} declares field {field:?} twice",
          self.name
        )));
      }
    }

    for (field, ty) in self.fields.iter().zip(&self.types) {
      if ty.trim().is_empty() {
        return Err(Error::Schema(format!(
          "table {:?}: field {field:?} has no type",
          self.name
        )));
      }
      validate_fragment(&self.name, ty)?;
    }
    for constraint in &self.constraints {
      validate_fragment(&self.name, constraint)?;
    }

    Ok(())
  }
}

/// Check that `ident` is a bare SQL identifier: ASCII alphanumerics and
/// underscores, not starting with a digit.
pub fn validate_identifier(ident: &str) -> Result<()> {
  let starts_ok = ident
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
  if !starts_ok || !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return Err(Error::Schema(format!("invalid identifier {ident:?}")));
  }
  Ok(())
}

/// Types and constraints are emitted verbatim, so they must not be able to
/// terminate the statement or open a string literal.
fn validate_fragment(table: &str, fragment: &str) -> Result<()> {
  if fragment.contains([';', '\'', '"', '`']) {
    return Err(Error::Schema(format!(
      "table {table:?}: unsafe column fragment {fragment:?}"
    )));
  }
  Ok(())
}
