use std::ops::{Deref, DerefMut};

use sqlx::SqliteConnection;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::Sqlite;

/// RAII guard over the single write connection.
///
/// Holding a `WriteGuard` is the only way to write. Dropping it returns the
/// connection to the write pool; a transaction that was begun on it and never
/// committed is rolled back by sqlx before the connection is reused.
#[must_use = "dropping the guard immediately releases write access"]
#[derive(Debug)]
pub struct WriteGuard {
   conn: PoolConnection<Sqlite>,
}

impl WriteGuard {
   pub(crate) fn new(conn: PoolConnection<Sqlite>) -> Self {
      Self { conn }
   }
}

impl Deref for WriteGuard {
   type Target = SqliteConnection;

   fn deref(&self) -> &Self::Target {
      &self.conn
   }
}

impl DerefMut for WriteGuard {
   fn deref_mut(&mut self) -> &mut Self::Target {
      &mut self.conn
   }
}
