//! Parameterised statements and the builders the data access layer uses.
//!
//! Only validated identifiers are ever rendered into SQL text. Every value
//! travels as a bound parameter.

use ykk_core::{
  Error as CoreError,
  schema::validate_identifier,
  value::{FieldValue, Filter, Row},
};

use crate::Result;

/// SQLite's historical `SQLITE_MAX_VARIABLE_NUMBER`. Newer builds allow
/// more, but multi-row inserts stay under this so any build accepts them.
pub const MAX_BOUND_PARAMS: usize = 999;

/// One SQL statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<FieldValue>,
}

impl Statement {
  pub fn new(sql: impl Into<String>) -> Self {
    Self { sql: sql.into(), params: Vec::new() }
  }

  /// Append a positional parameter.
  pub fn bind(mut self, value: impl Into<FieldValue>) -> Self {
    self.params.push(value.into());
    self
  }
}

impl From<&str> for Statement {
  fn from(sql: &str) -> Self { Self::new(sql) }
}

impl From<String> for Statement {
  fn from(sql: String) -> Self { Self::new(sql) }
}

/// Multi-row `INSERT INTO table (columns) VALUES (?, ...), (?, ...)`,
/// split into as many statements as the bound parameter limit requires.
pub fn insert_statements(
  table:   &str,
  columns: &[String],
  rows:    Vec<Row>,
) -> Result<Vec<Statement>> {
  validate_identifier(table)?;
  if columns.is_empty() {
    return Err(CoreError::Schema(format!("insert into {table:?} names no columns")).into());
  }
  for column in columns {
    validate_identifier(column)?;
  }
  if let Some((i, row)) = rows
    .iter()
    .enumerate()
    .find(|(_, row)| row.len() != columns.len())
  {
    return Err(
      CoreError::Schema(format!(
        "row {i} for {table:?} has {} values, expected {}",
        row.len(),
        columns.len()
      ))
      .into(),
    );
  }

  let placeholder = format!("({})", vec!["?"; columns.len()].join(", "));
  let head = format!("INSERT INTO {table} ({}) VALUES ", columns.join(", "));
  let per_chunk = (MAX_BOUND_PARAMS / columns.len()).max(1);

  let mut statements = Vec::new();
  let mut rows = rows.into_iter().peekable();
  while rows.peek().is_some() {
    let chunk: Vec<Row> = rows.by_ref().take(per_chunk).collect();
    let values = vec![placeholder.as_str(); chunk.len()].join(", ");
    statements.push(Statement {
      sql:    format!("{head}{values}"),
      params: chunk.into_iter().flatten().collect(),
    });
  }
  Ok(statements)
}

/// `SELECT * FROM table WHERE column = ?`.
pub fn select_by(table: &str, column: &str, value: impl Into<FieldValue>) -> Result<Statement> {
  validate_identifier(table)?;
  validate_identifier(column)?;
  Ok(Statement::new(format!("SELECT * FROM {table} WHERE {column} = ?")).bind(value))
}

/// `SELECT * FROM table [WHERE ...]`.
pub fn select_all(table: &str, filter: Option<&Filter>) -> Result<Statement> {
  validate_identifier(table)?;
  match filter.filter(|f| !f.is_empty()) {
    None => Ok(Statement::new(format!("SELECT * FROM {table}"))),
    Some(filter) => Ok(Statement {
      sql:    format!("SELECT * FROM {table} WHERE {}", filter.to_sql()?),
      params: filter.values().cloned().collect(),
    }),
  }
}

/// Counts `sqlite_master` entries for a table name.
pub fn table_exists(name: &str) -> Statement {
  Statement::new("SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
    .bind(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cols(names: &[&str]) -> Vec<String> { names.iter().map(|s| s.to_string()).collect() }

  #[test]
  fn single_chunk_insert() {
    let rows = vec![
      vec![FieldValue::from("a"), FieldValue::from("b")],
      vec![FieldValue::from("it's"), FieldValue::Null],
    ];
    let stmts = insert_statements("t", &cols(&["x", "y"]), rows).unwrap();
    assert_eq!(stmts.len(), 1);
    assert_eq!(stmts[0].sql, "INSERT INTO t (x, y) VALUES (?, ?), (?, ?)");
    assert_eq!(stmts[0].params.len(), 4);
    assert_eq!(stmts[0].params[2], FieldValue::from("it's"));
  }

  #[test]
  fn inserts_split_at_param_limit() {
    let columns = cols(&["a", "b", "c", "d"]);
    let per_chunk = MAX_BOUND_PARAMS / 4;
    let rows = (0..per_chunk + 3)
      .map(|i| vec![FieldValue::Integer(i as i64); 4])
      .collect();

    let stmts = insert_statements("t", &columns, rows).unwrap();
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[0].params.len(), per_chunk * 4);
    assert_eq!(stmts[1].params.len(), 12);
    assert!(stmts.iter().all(|s| s.params.len() <= MAX_BOUND_PARAMS));
  }

  #[test]
  fn no_rows_no_statements() {
    assert!(insert_statements("t", &cols(&["x"]), vec![]).unwrap().is_empty());
  }

  #[test]
  fn ragged_row_rejected() {
    let rows = vec![vec![FieldValue::from("only one")]];
    assert!(insert_statements("t", &cols(&["x", "y"]), rows).is_err());
  }

  #[test]
  fn select_all_with_and_without_filter() {
    assert_eq!(select_all("deaths", None).unwrap().sql, "SELECT * FROM deaths");

    let filter = Filter::new().eq("medium", "Film");
    let stmt = select_all("deaths", Some(&filter)).unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM deaths WHERE medium = ?");
    assert_eq!(stmt.params, vec![FieldValue::from("Film")]);

    let empty = Filter::new();
    assert_eq!(select_all("deaths", Some(&empty)).unwrap().sql, "SELECT * FROM deaths");
  }

  #[test]
  fn select_by_binds_value() {
    let stmt = select_by("deaths", "id", 7_i64).unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM deaths WHERE id = ?");
    assert_eq!(stmt.params, vec![FieldValue::Integer(7)]);
  }
}
