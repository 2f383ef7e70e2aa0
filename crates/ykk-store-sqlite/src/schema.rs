//! DDL generation for registered tables.
//!
//! Both statements are idempotent: `CREATE TABLE IF NOT EXISTS` is a no-op
//! for an existing table and `DROP TABLE IF EXISTS` is a no-op for a missing
//! one. Identifiers are validated before any SQL is rendered.

use ykk_core::schema::{TableDefinition, validate_identifier};

use crate::Result;

/// `CREATE TABLE IF NOT EXISTS name (field type constraint, ...)`.
pub fn create_table_sql(def: &TableDefinition) -> Result<String> {
  def.validate()?;

  let columns = def
    .fields
    .iter()
    .zip(&def.types)
    .zip(&def.constraints)
    .map(|((field, ty), constraint)| {
      let constraint = constraint.trim();
      if constraint.is_empty() {
        format!("{field} {}", ty.trim())
      } else {
        format!("{field} {} {constraint}", ty.trim())
      }
    })
    .collect::<Vec<_>>()
    .join(", ");

  let suffix = if def.without_rowid { " WITHOUT ROWID" } else { "" };
  Ok(format!("CREATE TABLE IF NOT EXISTS {} ({columns}){suffix}", def.name))
}

/// `DROP TABLE IF EXISTS name`.
pub fn drop_table_sql(name: &str) -> Result<String> {
  validate_identifier(name)?;
  Ok(format!("DROP TABLE IF EXISTS {name}"))
}
