//! # phonebook-conn-mgr
//!
//! Connection provider for the phonebook store, built on SQLx for SQLite.
//!
//! ## Core Types
//!
//! - **[`SqliteDatabase`]**: read-only pool plus a single-connection write pool
//! - **[`SqliteDatabaseConfig`]**: pool sizes and timeouts
//! - **[`WriteGuard`]**: RAII guard ensuring exclusive write access
//! - **[`Error`]**: error type for connection operations
//!
//! ## Architecture
//!
//! - **Serialized writes**: the write pool holds one connection, so writers queue
//! - **Concurrent reads**: readers use their own read-only connections
//! - **Lazy WAL mode**: enabled on the first write to a file database
//! - **In-memory mode**: one pinned connection serves reads and writes, for tests

mod config;
mod database;
mod error;
mod write_guard;

pub use config::SqliteDatabaseConfig;
pub use database::SqliteDatabase;
pub use error::{Error, Result};
pub use write_guard::WriteGuard;
