//! JSON REST API for the deaths resource.
//!
//! Exposes an axum [`Router`] backed by any [`ykk_core::store::DeathStore`].
//! Transport concerns (binding, tracing layers) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new().merge(ykk_api::api_router(store.clone()))
//! ```

pub mod deaths;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use ykk_core::store::DeathStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DeathStore + 'static,
{
  Router::new()
    .route("/deaths", get(deaths::list::<S>))
    .route("/deaths/{id}", get(deaths::get_one::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use ykk_core::{
    death::Death,
    registry::{Model, Registry},
    value::FieldValue,
  };
  use ykk_store_sqlite::{Database, SqliteStore};

  async fn make_store() -> Arc<SqliteStore> {
    let db = Database::open_in_memory().await.unwrap();
    let mut registry = Registry::new();
    registry.register_tables(Death::tables());
    db.create_tables(registry.tables()).await.unwrap();

    let def = registry.table("deaths").unwrap();
    db.insert("deaths", def.insert_columns(), vec![
      row("Television", "Death 1", "It's a bus."),
      row("Film", "Death 2", "Fell."),
    ])
    .await
    .unwrap();

    Arc::new(SqliteStore::new(db, &registry).unwrap())
  }

  fn row(medium: &str, title: &str, description: &str) -> Vec<FieldValue> {
    vec![
      medium.into(),
      title.into(),
      description.into(),
      format!("{title}.png").into(),
    ]
  }

  async fn get_json(store: Arc<SqliteStore>, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = api_router(store).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
  }

  #[tokio::test]
  async fn list_returns_every_record() {
    let (status, body) = get_json(make_store().await, "/deaths").await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|d| d["description"] == "It's a bus."));
  }

  #[tokio::test]
  async fn list_filters_by_medium() {
    let (status, body) = get_json(make_store().await, "/deaths?medium=Film").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Death 2");
  }

  #[tokio::test]
  async fn get_one_renders_variant_shape() {
    let (status, body) = get_json(make_store().await, "/deaths/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!({
        "id": 1, "medium": "Television", "title": "Death 1",
        "description": "It's a bus.", "image": "Death 1.png", "season": ""
      })
    );

    let (_, body) = get_json(make_store().await, "/deaths/2").await;
    assert!(body.get("season").is_none());
    assert_eq!(body["medium"], "Film");
  }

  #[tokio::test]
  async fn unknown_id_returns_404() {
    let (status, body) = get_json(make_store().await, "/deaths/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "death 42 not found");
  }

  #[tokio::test]
  async fn non_numeric_id_is_rejected() {
    let (status, body) = get_json(make_store().await, "/deaths/kenny").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn store_failure_returns_500() {
    let store = make_store().await;
    store.database().drop_tables(["deaths"]).await.unwrap();

    let (status, body) = get_json(store, "/deaths").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no such table"));
  }
}
