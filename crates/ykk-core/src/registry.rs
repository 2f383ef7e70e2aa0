//! The schema and input registries.
//!
//! A [`Registry`] is built once at startup from every [`Model`], validated,
//! and then only read: the bootstrap orchestrator walks it to create and seed
//! tables, and stores look up their table definitions in it.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, schema::TableDefinition};

/// Location of the JSON document that seeds one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSource {
  pub table: String,
  pub path:  PathBuf,
}

impl SeedSource {
  pub fn new(table: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self { table: table.into(), path: path.into() }
  }
}

/// A model collaborator: declares the tables it needs and where their seed
/// data lives.
pub trait Model {
  fn tables() -> Vec<TableDefinition>;

  /// Seed sources, with paths resolved against `data_dir`.
  fn seeds(data_dir: &Path) -> Vec<SeedSource>;
}

/// Table definitions and seed sources keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
  tables: BTreeMap<String, TableDefinition>,
  seeds:  BTreeMap<String, SeedSource>,
}

impl Registry {
  pub fn new() -> Self { Self::default() }

  /// Register everything `M` declares.
  pub fn register<M: Model>(&mut self, data_dir: &Path) -> &mut Self {
    self.register_tables(M::tables());
    self.register_seeds(M::seeds(data_dir));
    self
  }

  /// Add table definitions. A later definition replaces an earlier one with
  /// the same name.
  pub fn register_tables(&mut self, tables: impl IntoIterator<Item = TableDefinition>) {
    for def in tables {
      if self.tables.contains_key(&def.name) {
        tracing::warn!(table = %def.name, "replacing registered table definition");
      }
      self.tables.insert(def.name.clone(), def);
    }
  }

  /// Add seed sources. At most one source per table is kept.
  pub fn register_seeds(&mut self, seeds: impl IntoIterator<Item = SeedSource>) {
    for seed in seeds {
      if self.seeds.contains_key(&seed.table) {
        tracing::warn!(table = %seed.table, "replacing registered seed source");
      }
      self.seeds.insert(seed.table.clone(), seed);
    }
  }

  pub fn table(&self, name: &str) -> Result<&TableDefinition> {
    self
      .tables
      .get(name)
      .ok_or_else(|| Error::UnknownTable(name.to_owned()))
  }

  pub fn tables(&self) -> impl Iterator<Item = &TableDefinition> { self.tables.values() }

  pub fn table_names(&self) -> impl Iterator<Item = &str> {
    self.tables.keys().map(String::as_str)
  }

  pub fn seeds(&self) -> impl Iterator<Item = &SeedSource> { self.seeds.values() }

  /// Check every definition, and that every seed targets a registered table.
  pub fn validate(&self) -> Result<()> {
    for (name, def) in &self.tables {
      def.validate()?;
      if *name != def.name {
        return Err(Error::Schema(format!(
          "table registered as {name:?} is named {:?}",
          def.name
        )));
      }
    }
    for seed in self.seeds.values() {
      self.table(&seed.table)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Widgets;

  impl Model for Widgets {
    fn tables() -> Vec<TableDefinition> {
      vec![TableDefinition::new("widgets", [
        ("id", "INTEGER", "PRIMARY KEY"),
        ("label", "TEXT", "NOT NULL"),
      ])]
    }

    fn seeds(data_dir: &Path) -> Vec<SeedSource> {
      vec![SeedSource::new("widgets", data_dir.join("widgets.json"))]
    }
  }

  #[test]
  fn register_model_resolves_seed_paths() {
    let mut registry = Registry::new();
    registry.register::<Widgets>(Path::new("/srv/data"));

    registry.validate().unwrap();
    assert_eq!(registry.table_names().collect::<Vec<_>>(), vec!["widgets"]);
    let seed = registry.seeds().next().unwrap();
    assert_eq!(seed.path, PathBuf::from("/srv/data/widgets.json"));
  }

  #[test]
  fn later_registration_replaces_earlier() {
    let mut registry = Registry::new();
    registry.register::<Widgets>(Path::new("a"));
    registry.register_seeds([SeedSource::new("widgets", "b/other.json")]);

    assert_eq!(registry.seeds().count(), 1);
    assert_eq!(registry.seeds().next().unwrap().path, PathBuf::from("b/other.json"));
  }

  #[test]
  fn seed_for_unknown_table_fails_validation() {
    let mut registry = Registry::new();
    registry.register_seeds([SeedSource::new("ghosts", "ghosts.json")]);
    assert!(matches!(registry.validate(), Err(Error::UnknownTable(t)) if t == "ghosts"));
  }

  #[test]
  fn unknown_table_lookup_errors() {
    let registry = Registry::new();
    assert!(matches!(registry.table("deaths"), Err(Error::UnknownTable(_))));
  }
}
