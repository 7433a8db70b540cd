//! Database module
//!
//! Connection handling for PostgreSQL.

pub mod connection;

pub use connection::{create_pool, run_migrations};
