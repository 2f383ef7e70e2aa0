//! Core types and trait definitions for the YKK deaths service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the table registry, the seed loader and the `Death` model; storage
//! backends and the HTTP layer depend on it.

pub mod death;
pub mod error;
pub mod registry;
pub mod schema;
pub mod seed;
pub mod store;
pub mod value;

pub use error::{Error, Result};
