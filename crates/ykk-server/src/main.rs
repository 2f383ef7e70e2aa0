//! ykk server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), wipes and
//! reseeds the SQLite database from the JSON files in the data directory,
//! and serves the deaths API over HTTP.
//!
//! # Rebuilding the database without serving
//!
//! ```
//! cargo run -p ykk-server --bin ykk -- --bootstrap-only
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ykk_server::ServerConfig;
use ykk_store_sqlite::{Database, SqliteStore};

#[derive(Parser)]
#[command(author, version, about = "YKK deaths API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Recreate and seed the database, then exit without serving.
  #[arg(long)]
  bootstrap_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Bootstrap runs to completion before anything is served.
  let registry = ykk_server::registry(&server_cfg.data_dir);

  let db = Database::open(&server_cfg.database_path, &server_cfg.open_options())
    .await
    .with_context(|| format!("failed to open database at {:?}", server_cfg.database_path))?;

  ykk_store_sqlite::bootstrap(&db, &registry)
    .await
    .context("bootstrap failed")?;

  if cli.bootstrap_only {
    return Ok(());
  }

  let store = SqliteStore::new(db, &registry).context("failed to build store")?;
  let app = ykk_server::router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
