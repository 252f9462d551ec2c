//! Interactive contact directory.
//!
//! The CLI shell around [`phonebook_store`]: configuration, the bulk load
//! file reader and the numbered menu session. All business rules live in the
//! store crate.

mod commands;
pub mod config;
pub mod csv_import;
mod error;

pub use commands::{MenuChoice, Session};
pub use config::{Cli, PhonebookConfig};
pub use error::{Error, Result};
