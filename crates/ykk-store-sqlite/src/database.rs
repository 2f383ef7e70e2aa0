//! [`Database`]: the generic data access layer.
//!
//! One long-lived [`tokio_rusqlite::Connection`] per handle. Statements run
//! one at a time on the connection's thread, so clones of the handle share
//! and serialise access without any extra locking.

use std::{path::Path, time::Duration};

use ykk_core::{
  schema::{TableDefinition, validate_identifier},
  value::{FieldValue, Filter, Row},
};

use crate::{
  Error, Result,
  encode::{decode_row, encode_value},
  schema::{create_table_sql, drop_table_sql},
  statement::{self, Statement},
};

/// Connection settings applied when a [`Database`] is opened.
#[derive(Debug, Clone)]
pub struct OpenOptions {
  /// How long a statement waits on a locked database before failing.
  pub busy_timeout: Duration,
}

impl Default for OpenOptions {
  fn default() -> Self { Self { busy_timeout: Duration::from_secs(5) } }
}

/// A shared handle to one SQLite database.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct Database {
  conn: tokio_rusqlite::Connection,
}

impl Database {
  /// Open (or create) the database file at `path`.
  pub async fn open(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let db = Self { conn };
    db.configure(options).await?;
    Ok(db)
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let db = Self { conn };
    db.configure(&OpenOptions::default()).await?;
    Ok(db)
  }

  async fn configure(&self, options: &OpenOptions) -> Result<()> {
    let busy_timeout = options.busy_timeout;
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
      })
      .await
      .map_err(|e| Error::storage("PRAGMA foreign_keys = ON", e))
  }

  // ── Generic statements ────────────────────────────────────────────────────

  /// Run one statement.
  ///
  /// With `expect_results` every result row is returned. Otherwise the
  /// statement runs in autocommit mode, so its changes are committed when it
  /// returns, and the result is `None`.
  pub async fn execute(
    &self,
    statement: impl Into<Statement>,
    expect_results: bool,
  ) -> Result<Option<Vec<Row>>> {
    let statement = statement.into();
    let sql = statement.sql.clone();
    tracing::trace!(%sql, params = statement.params.len(), "execute");

    self
      .conn
      .call(move |conn| {
        if expect_results {
          Ok(Some(query_rows(conn, &statement)?))
        } else {
          discard_rows(conn, &statement)?;
          Ok(None)
        }
      })
      .await
      .map_err(|e| Error::storage(sql, e))
  }

  /// Run `statements` in one transaction; any failure rolls all of them
  /// back. Returns the total number of changed rows.
  pub(crate) async fn run_batch(&self, statements: Vec<Statement>) -> Result<usize> {
    if statements.is_empty() {
      return Ok(0);
    }

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut changed = 0;
        for statement in &statements {
          match execute_one(&tx, statement) {
            Ok(n) => changed += n,
            // Dropping `tx` rolls back.
            Err(e) => return Ok(Err((statement.sql.clone(), e))),
          }
        }
        tx.commit()?;
        Ok(Ok(changed))
      })
      .await
      .map_err(|e| Error::storage("BEGIN ... COMMIT", e))?;

    outcome.map_err(|(sql, e)| Error::storage(sql, e))
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Insert `rows` into `columns` of `table`. The primary key column is not
  /// listed; the database assigns it.
  ///
  /// All rows land in one transaction, even when the parameter limit splits
  /// them across several statements. Returns the number of inserted rows.
  pub async fn insert(&self, table: &str, columns: &[String], rows: Vec<Row>) -> Result<usize> {
    let statements = statement::insert_statements(table, columns, rows)?;
    let inserted = self.run_batch(statements).await?;
    tracing::debug!(table, inserted, "insert");
    Ok(inserted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The single row of `table` whose `id_column` equals `id`.
  ///
  /// Zero matches and more than one match both return `None`.
  pub async fn fetch(
    &self,
    table: &str,
    id: impl Into<FieldValue>,
    id_column: &str,
  ) -> Result<Option<Row>> {
    let id = id.into();
    let statement = statement::select_by(table, id_column, id.clone())?;
    let mut rows = self.execute(statement, true).await?.unwrap_or_default();

    match rows.len() {
      1 => Ok(rows.pop()),
      0 => Ok(None),
      matched => {
        tracing::warn!(table, id_column, ?id, matched, "fetch matched more than one row");
        Ok(None)
      }
    }
  }

  /// [`Database::fetch`] on the conventional `id` column.
  pub async fn fetch_by_id(&self, table: &str, id: i64) -> Result<Option<Row>> {
    self.fetch(table, id, "id").await
  }

  /// Every row of `table`, or only those matching `filter`.
  pub async fn fetch_all(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<Row>> {
    let statement = statement::select_all(table, filter)?;
    Ok(self.execute(statement, true).await?.unwrap_or_default())
  }

  // ── Schema ────────────────────────────────────────────────────────────────

  /// Create every table in `defs` that does not exist yet.
  ///
  /// All definitions are validated before anything is executed.
  pub async fn create_tables<'a>(
    &self,
    defs: impl IntoIterator<Item = &'a TableDefinition>,
  ) -> Result<()> {
    let statements = defs
      .into_iter()
      .map(|def| create_table_sql(def).map(Statement::new))
      .collect::<Result<Vec<_>>>()?;
    self.run_batch(statements).await?;
    Ok(())
  }

  /// Drop every named table that exists.
  pub async fn drop_tables<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let statements = names
      .into_iter()
      .map(|name| drop_table_sql(name).map(Statement::new))
      .collect::<Result<Vec<_>>>()?;
    self.run_batch(statements).await?;
    Ok(())
  }

  pub async fn has_table(&self, name: &str) -> Result<bool> {
    validate_identifier(name)?;
    let rows = self
      .execute(statement::table_exists(name), true)
      .await?
      .unwrap_or_default();
    Ok(matches!(rows.first().and_then(|r| r.first()), Some(FieldValue::Integer(1))))
  }

  /// True when every named table exists.
  pub async fn has_tables<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<bool> {
    for name in names {
      if !self.has_table(name).await? {
        return Ok(false);
      }
    }
    Ok(true)
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────

fn execute_one(conn: &rusqlite::Connection, statement: &Statement) -> rusqlite::Result<usize> {
  let mut prepared = conn.prepare(&statement.sql)?;
  prepared.execute(rusqlite::params_from_iter(statement.params.iter().map(encode_value)))
}

/// Step `statement` to completion, dropping any rows it yields.
fn discard_rows(conn: &rusqlite::Connection, statement: &Statement) -> rusqlite::Result<()> {
  let mut prepared = conn.prepare(&statement.sql)?;
  let mut rows =
    prepared.query(rusqlite::params_from_iter(statement.params.iter().map(encode_value)))?;
  while rows.next()?.is_some() {}
  Ok(())
}

fn query_rows(conn: &rusqlite::Connection, statement: &Statement) -> rusqlite::Result<Vec<Row>> {
  let mut prepared = conn.prepare(&statement.sql)?;
  let width = prepared.column_count();
  let rows = prepared
    .query_map(
      rusqlite::params_from_iter(statement.params.iter().map(encode_value)),
      |row| decode_row(row, width),
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
