//! # phonebook-store
//!
//! Data-access and validation layer of the phonebook.
//!
//! Every operation acquires its own connection from the injected
//! [`SqliteDatabase`], runs its statements, commits and releases the
//! connection before returning. Nothing is cached between calls.
//!
//! ```no_run
//! # async fn demo() -> phonebook_store::Result<()> {
//! use phonebook_conn_mgr::SqliteDatabase;
//! use phonebook_store::{ContactStore, NewContact};
//!
//! let store = ContactStore::new(SqliteDatabase::connect("phonebook.db", None).await?);
//! store.ensure_schema().await?;
//! store.upsert_by_name(&NewContact::new("Alice", "555-0100")).await?;
//! let rejected = store
//!    .batch_upsert(vec![NewContact::new("Bob", "not a phone")])
//!    .await?;
//! assert_eq!(rejected.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use phonebook_conn_mgr::SqliteDatabase;

mod contact;
mod error;
pub mod pagination;
mod reads;
pub mod schema;
pub mod validate;
mod writes;

pub use contact::{
   BulkInsertSummary, Contact, ContactChanges, ContactFilter, InsertOutcome, NewContact,
   RejectReason, RejectedRecord, UpdateSummary, UpsertOutcome,
};
pub use error::{Error, Result};
pub use pagination::Page;
pub use validate::{is_valid_phone, validate_phone};

/// Contact operations over an injected connection provider.
#[derive(Debug, Clone)]
pub struct ContactStore {
   db: Arc<SqliteDatabase>,
}

impl ContactStore {
   pub fn new(db: Arc<SqliteDatabase>) -> Self {
      Self { db }
   }

   /// The underlying database, e.g. to close it.
   pub fn database(&self) -> &Arc<SqliteDatabase> {
      &self.db
   }
}
