//! Error type for `ykk-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ykk_core::Error),

  /// The connection could not be opened, or has gone away.
  #[error("connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  /// A statement failed at the storage boundary.
  #[error("statement failed: {source} (in `{statement}`)")]
  Storage {
    statement: String,
    #[source]
    source:    tokio_rusqlite::Error,
  },
}

impl Error {
  pub(crate) fn storage(statement: impl Into<String>, source: impl Into<tokio_rusqlite::Error>) -> Self {
    Self::Storage { statement: statement.into(), source: source.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
