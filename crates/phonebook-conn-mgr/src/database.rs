//! SQLite database with a read pool and a single exclusive writer

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::config::SqliteDatabaseConfig;
use crate::error::{Error, Result};
use crate::write_guard::WriteGuard;

/// SQLite database with pooled reads and serialized writes.
///
/// ## Architecture
///
/// - **`read_pool`**: read-only connections for queries
/// - **`write_conn`**: a pool capped at one connection, so holding a
///   [`WriteGuard`] means holding the only writer
///
/// An in-memory database has no file to share between connections, so both
/// handles point at the same single pinned connection.
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect (file or in-memory)
/// 2. Reads go through read_pool()
/// 3. Writes go through acquire_writer() (WAL is enabled on the first one)
/// 4. close() or remove() when done
/// ```
#[derive(Debug)]
pub struct SqliteDatabase {
   read_pool: Pool<Sqlite>,

   write_conn: Pool<Sqlite>,

   /// Set once `PRAGMA journal_mode = WAL` has run on the writer
   wal_initialized: AtomicBool,

   closed: AtomicBool,

   /// `None` for in-memory databases
   path: Option<PathBuf>,
}

impl SqliteDatabase {
   /// Open (creating if missing) the database file at `path`.
   ///
   /// Missing parent directories are created.
   pub async fn connect(
      path: impl AsRef<Path>,
      custom_config: Option<SqliteDatabaseConfig>,
   ) -> Result<Arc<Self>> {
      let path = path.as_ref().to_path_buf();
      let config = custom_config.unwrap_or_default();

      if let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         tokio::fs::create_dir_all(parent).await?;
      }

      // The writer must exist first: it creates the file the readers open.
      // Keeping it alive also keeps the WAL index around for read-only peers.
      let write_options = SqliteConnectOptions::new()
         .filename(&path)
         .create_if_missing(true);
      let write_conn = SqlitePoolOptions::new()
         .max_connections(1)
         .min_connections(1)
         .idle_timeout(config.idle_timeout)
         .acquire_timeout(config.acquire_timeout)
         .connect_with(write_options)
         .await?;

      let read_options = SqliteConnectOptions::new()
         .filename(&path)
         .read_only(true);
      let read_pool = SqlitePoolOptions::new()
         .max_connections(config.max_read_connections.max(1))
         .idle_timeout(config.idle_timeout)
         .acquire_timeout(config.acquire_timeout)
         .connect_with(read_options)
         .await?;

      debug!(
         "Opened database {} with {} read connection(s)",
         path.display(),
         config.max_read_connections
      );

      Ok(Arc::new(Self {
         read_pool,
         write_conn,
         wal_initialized: AtomicBool::new(false),
         closed: AtomicBool::new(false),
         path: Some(path),
      }))
   }

   /// Open a private in-memory database.
   ///
   /// The data lives exactly as long as the returned handle's single
   /// connection, which is never reaped for idleness.
   pub async fn connect_in_memory() -> Result<Arc<Self>> {
      let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
      let pool = SqlitePoolOptions::new()
         .max_connections(1)
         .min_connections(1)
         .idle_timeout(None::<Duration>)
         .max_lifetime(None::<Duration>)
         .connect_with(options)
         .await?;

      debug!("Opened in-memory database");

      Ok(Arc::new(Self {
         read_pool: pool.clone(),
         write_conn: pool,
         wal_initialized: AtomicBool::new(true),
         closed: AtomicBool::new(false),
         path: None,
      }))
   }

   /// Path of the database file, or `None` when in memory.
   pub fn path(&self) -> Option<&Path> {
      self.path.as_deref()
   }

   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::Acquire)
   }

   /// Pool used for read-only queries.
   pub fn read_pool(&self) -> Result<&Pool<Sqlite>> {
      self.ensure_open()?;
      Ok(&self.read_pool)
   }

   /// Wait for exclusive write access.
   ///
   /// The first writer on a file database switches it to WAL so that readers
   /// are not blocked while a write is in progress.
   pub async fn acquire_writer(&self) -> Result<WriteGuard> {
      self.ensure_open()?;
      let mut conn = self.write_conn.acquire().await?;

      if !self.wal_initialized.load(Ordering::Acquire) {
         sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&mut *conn)
            .await?;
         self.wal_initialized.store(true, Ordering::Release);
         debug!("Enabled WAL journal mode");
      }

      Ok(WriteGuard::new(conn))
   }

   /// Close both pools. Calling it again is a no-op.
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::AcqRel) {
         return Ok(());
      }

      self.read_pool.close().await;
      self.write_conn.close().await;
      debug!("Closed database {}", self.display_name());
      Ok(())
   }

   /// Close the database and delete its file along with the WAL companions.
   pub async fn remove(&self) -> Result<()> {
      self.close().await?;

      let Some(path) = &self.path else {
         return Ok(());
      };

      for suffix in ["", "-wal", "-shm"] {
         let mut file = path.clone().into_os_string();
         file.push(suffix);
         match tokio::fs::remove_file(&file).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
         }
      }

      debug!("Removed database {}", path.display());
      Ok(())
   }

   fn ensure_open(&self) -> Result<()> {
      if self.is_closed() {
         return Err(Error::DatabaseClosed);
      }
      Ok(())
   }

   fn display_name(&self) -> String {
      match &self.path {
         Some(path) => path.display().to_string(),
         None => ":memory:".to_string(),
      }
   }
}
