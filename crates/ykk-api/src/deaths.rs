//! Handlers for `/deaths` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/deaths` | Optional `?medium=<medium>` |
//! | `GET`  | `/deaths/:id` | 404 if not found, 400 if `id` is not an integer |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use serde::Deserialize;
use ykk_core::{death::DeathRecord, store::DeathStore, value::Filter};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to deaths in this medium, e.g. `Television`.
  pub medium: Option<String>,
}

impl ListParams {
  fn filter(self) -> Option<Filter> {
    self.medium.map(|m| Filter::new().eq("medium", m))
  }
}

/// `GET /deaths[?medium=<medium>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<DeathRecord>>, ApiError>
where
  S: DeathStore,
{
  let Query(params) = params?;
  let deaths = store
    .list_deaths(params.filter())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(deaths))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /deaths/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeathRecord>, ApiError>
where
  S: DeathStore,
{
  let Path(id) = id?;
  let death = store
    .get_death(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("death {id} not found")))?;
  Ok(Json(death))
}
