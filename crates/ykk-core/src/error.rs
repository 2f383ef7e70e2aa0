//! Error types for `ykk-core`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A table definition or identifier cannot be turned into valid SQL.
  #[error("schema error: {0}")]
  Schema(String),

  #[error("table {0:?} is not registered")]
  UnknownTable(String),

  /// The seed document is not a JSON array of flat objects.
  #[error("malformed seed {origin}: {reason}")]
  MalformedSeed { origin: String, reason: String },

  #[error("failed to read seed file {path:?}: {source}")]
  SeedRead {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("seed record {record} for table {table:?} is missing field {field:?}")]
  MissingField {
    table:  String,
    field:  String,
    record: usize,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
