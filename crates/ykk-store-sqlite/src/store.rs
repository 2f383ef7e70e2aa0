//! [`SqliteStore`] — the SQLite implementation of [`DeathStore`].

use std::sync::Arc;

use ykk_core::{
  death::{self, DeathRecord, record_from_row},
  registry::Registry,
  schema::TableDefinition,
  store::DeathStore,
  value::Filter,
};

use crate::{Database, Error, Result};

/// Serves `deaths` reads from a bootstrapped [`Database`].
///
/// Cloning is cheap — the database handle and definition are shared.
#[derive(Clone)]
pub struct SqliteStore {
  db:     Database,
  deaths: Arc<TableDefinition>,
}

impl SqliteStore {
  /// Wrap `db`, taking the `deaths` definition from `registry`.
  pub fn new(db: Database, registry: &Registry) -> Result<Self> {
    let deaths = registry.table(death::TABLE)?.clone();
    Ok(Self { db, deaths: Arc::new(deaths) })
  }

  pub fn database(&self) -> &Database { &self.db }
}

impl DeathStore for SqliteStore {
  type Error = Error;

  async fn list_deaths(&self, filter: Option<Filter>) -> Result<Vec<DeathRecord>> {
    let rows = self.db.fetch_all(&self.deaths.name, filter.as_ref()).await?;
    rows
      .into_iter()
      .map(|row| record_from_row(&self.deaths, row).map_err(Error::from))
      .collect()
  }

  async fn get_death(&self, id: i64) -> Result<Option<DeathRecord>> {
    let row = self
      .db
      .fetch(&self.deaths.name, id, self.deaths.primary_key())
      .await?;
    Ok(row.map(|row| record_from_row(&self.deaths, row)).transpose()?)
  }
}
