//! The startup sequence: wipe, recreate and seed every registered table.
//!
//! The database is treated as a disposable copy of the seed files. Every
//! seed is read and shaped into rows before storage is touched, and the
//! drop / create / insert statements then run as one transaction, so a
//! failed bootstrap leaves the database exactly as it found it.

use std::collections::BTreeMap;

use ykk_core::{
  registry::Registry,
  seed::{load_seed, rows_for},
};

use crate::{
  Database, Result,
  schema::{create_table_sql, drop_table_sql},
  statement::{Statement, insert_statements},
};

/// What a successful [`bootstrap`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
  /// Tables dropped and recreated, in creation order.
  pub tables: Vec<String>,
  /// Rows inserted per seeded table.
  pub seeded: BTreeMap<String, usize>,
}

/// Drop and recreate every table in `registry`, then insert its seed rows.
///
/// Must complete before the database serves any reads.
pub async fn bootstrap(db: &Database, registry: &Registry) -> Result<BootstrapReport> {
  registry.validate()?;

  let mut statements: Vec<Statement> = registry
    .table_names()
    .map(|name| drop_table_sql(name).map(Statement::new))
    .collect::<Result<_>>()?;

  let mut report = BootstrapReport::default();
  for def in registry.tables() {
    statements.push(Statement::new(create_table_sql(def)?));
    report.tables.push(def.name.clone());
  }

  for source in registry.seeds() {
    let def = registry.table(&source.table)?;
    let records = load_seed(source)?;
    let rows = rows_for(def, &records)?;
    tracing::debug!(table = %def.name, path = %source.path.display(), rows = rows.len(), "seed loaded");

    report.seeded.insert(def.name.clone(), rows.len());
    statements.extend(insert_statements(&def.name, def.insert_columns(), rows)?);
  }

  db.run_batch(statements).await?;

  for (table, rows) in &report.seeded {
    tracing::info!(table = %table, rows, "table seeded");
  }
  tracing::info!(tables = report.tables.len(), "bootstrap complete");
  Ok(report)
}
