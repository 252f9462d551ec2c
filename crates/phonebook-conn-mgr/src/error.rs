//! Failures of the phonebook connection provider.

use thiserror::Error;

/// Why a [`SqliteDatabase`](crate::SqliteDatabase) could not hand out a
/// connection or finish a lifecycle step.
#[derive(Error, Debug)]
pub enum Error {
   /// Creating the database's parent directory, or deleting the database
   /// file and its `-wal`/`-shm` companions, failed
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Opening a pool, acquiring a connection or switching on WAL failed
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// [`close`](crate::SqliteDatabase::close) already ran; no further
   /// connections are handed out
   #[error("Database has been closed")]
   DatabaseClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
