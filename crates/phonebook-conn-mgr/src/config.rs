//! Pool settings for [`SqliteDatabase`](crate::SqliteDatabase)

use std::time::Duration;

/// Configuration for the read and write pools of a `SqliteDatabase`.
///
/// # Examples
///
/// ```
/// use phonebook_conn_mgr::SqliteDatabaseConfig;
/// use std::time::Duration;
///
/// let config = SqliteDatabaseConfig {
///    max_read_connections: 2,
///    ..Default::default()
/// };
/// assert_eq!(config.idle_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteDatabaseConfig {
   /// Maximum number of concurrent read-only connections.
   ///
   /// Ignored for in-memory databases, which serve reads from the writer.
   ///
   /// Default: 6
   pub max_read_connections: u32,

   /// Idle connections are closed after this long.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,

   /// How long an operation waits for a pooled connection before failing.
   ///
   /// Default: 30 seconds
   pub acquire_timeout: Duration,
}

impl Default for SqliteDatabaseConfig {
   fn default() -> Self {
      Self {
         max_read_connections: 6,
         idle_timeout: Duration::from_secs(30),
         acquire_timeout: Duration::from_secs(30),
      }
   }
}
