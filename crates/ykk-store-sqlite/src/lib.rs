//! SQLite backend for the YKK deaths service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on the connection's
//! own thread without blocking the async runtime. Provides the generic data
//! access layer ([`Database`]), the bootstrap orchestrator ([`bootstrap`])
//! and the [`DeathStore`](ykk_core::store::DeathStore) implementation
//! ([`SqliteStore`]).

mod encode;
mod store;

pub mod bootstrap;
pub mod database;
pub mod error;
pub mod schema;
pub mod statement;

pub use bootstrap::{BootstrapReport, bootstrap};
pub use database::{Database, OpenOptions};
pub use error::{Error, Result};
pub use statement::Statement;
pub use store::SqliteStore;
