//! The `DeathStore` trait.
//!
//! Implemented by storage backends (e.g. `ykk-store-sqlite`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{death::DeathRecord, value::Filter};

/// Read access to the `deaths` resource.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait DeathStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every stored death, or those matching `filter`.
  fn list_deaths(
    &self,
    filter: Option<Filter>,
  ) -> impl Future<Output = Result<Vec<DeathRecord>, Self::Error>> + Send + '_;

  /// The death with the given id. Returns `None` when no single row matches.
  fn get_death(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<DeathRecord>, Self::Error>> + Send + '_;
}
