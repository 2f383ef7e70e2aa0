//! HTTP server assembly for the YKK deaths service.
//!
//! Holds the runtime configuration, the model registrations and the
//! top-level router. The binary in `main.rs` wires them together.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use ykk_core::{death::Death, registry::Registry, store::DeathStore};
use ykk_store_sqlite::OpenOptions;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `YKK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  /// SQLite database file. Wiped and reseeded on every start.
  #[serde(default = "default_database_path")]
  pub database_path:   PathBuf,
  /// Directory holding the JSON seed files.
  #[serde(default = "default_data_dir")]
  pub data_dir:        PathBuf,
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_database_path() -> PathBuf { PathBuf::from("ykk.sqlite3") }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_busy_timeout_ms() -> u64 { 5_000 }

impl ServerConfig {
  /// Layer the optional file at `path` under `YKK_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("YKK"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn open_options(&self) -> OpenOptions {
    OpenOptions { busy_timeout: Duration::from_millis(self.busy_timeout_ms) }
  }
}

// ─── Models ───────────────────────────────────────────────────────────────────

/// Register every model's tables and seed sources.
pub fn registry(data_dir: &Path) -> Registry {
  let mut registry = Registry::new();
  registry.register::<Death>(data_dir);
  registry
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level router: the index page plus the deaths API, with
/// request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: DeathStore + 'static,
{
  Router::new()
    .route("/", get(index))
    .merge(ykk_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn index() -> &'static str { "Hello World!" }

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;
  use ykk_store_sqlite::{Database, SqliteStore};

  fn from_toml(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.database_path, PathBuf::from("ykk.sqlite3"));
    assert_eq!(cfg.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.open_options().busy_timeout, Duration::from_secs(5));
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      r#"
        host = "0.0.0.0"
        port = 9000
        database_path = "/tmp/deaths.db"
        busy_timeout_ms = 250
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.database_path, PathBuf::from("/tmp/deaths.db"));
    assert_eq!(cfg.open_options().busy_timeout, Duration::from_millis(250));
  }

  #[test]
  fn missing_config_file_is_not_an_error() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/ykk/config.toml")).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("data"));
  }

  #[test]
  fn registry_contains_deaths() {
    let registry = registry(Path::new("seeds"));
    registry.validate().unwrap();
    assert!(registry.table("deaths").is_ok());
    assert_eq!(
      registry.seeds().next().unwrap().path,
      PathBuf::from("seeds/deaths.json")
    );
  }

  #[tokio::test]
  async fn index_says_hello() {
    let db = Database::open_in_memory().await.unwrap();
    let store = Arc::new(SqliteStore::new(db, &registry(Path::new("data"))).unwrap());

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = router(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Hello World!");
  }
}
