/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for phonebook store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations, including constraint violations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] phonebook_conn_mgr::Error),

   /// Phone number failed the shape check.
   #[error("invalid phone number: {0:?}")]
   InvalidPhone(String),

   /// Search pattern could not be compiled into a matcher.
   #[error("invalid search pattern: {0}")]
   InvalidPattern(#[from] regex::Error),

   /// Page offset must not be negative.
   #[error("page offset must not be negative (got {0})")]
   NegativeOffset(i64),
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::ConnectionManager(phonebook_conn_mgr::Error::DatabaseClosed) => {
            "DATABASE_CLOSED".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::InvalidPhone(_) => "INVALID_PHONE".to_string(),
         Error::InvalidPattern(_) => "INVALID_PATTERN".to_string(),
         Error::NegativeOffset(_) => "NEGATIVE_OFFSET".to_string(),
      }
   }

   /// Whether this is a UNIQUE constraint failure, i.e. a phone that is
   /// already taken.
   pub fn is_unique_violation(&self) -> bool {
      match self {
         Error::Sqlx(e) => e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation()),
         _ => false,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_invalid_phone() {
      let err = Error::InvalidPhone("abc".into());
      assert_eq!(err.error_code(), "INVALID_PHONE");
      assert!(err.to_string().contains("\"abc\""));
   }

   #[test]
   fn test_error_code_negative_offset() {
      let err = Error::NegativeOffset(-3);
      assert_eq!(err.error_code(), "NEGATIVE_OFFSET");
      assert!(err.to_string().contains("-3"));
   }

   #[test]
   fn test_error_code_invalid_pattern() {
      let err = Error::InvalidPattern(regex::Error::CompiledTooBig(10));
      assert_eq!(err.error_code(), "INVALID_PATTERN");
   }

   #[test]
   fn test_error_code_database_closed() {
      let err = Error::ConnectionManager(phonebook_conn_mgr::Error::DatabaseClosed);
      assert_eq!(err.error_code(), "DATABASE_CLOSED");
      assert_eq!(err.to_string(), "Database has been closed");
   }

   #[test]
   fn test_error_code_connection_io() {
      let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
      let err = Error::ConnectionManager(phonebook_conn_mgr::Error::Io(io));
      assert_eq!(err.error_code(), "CONNECTION_ERROR");
   }

   #[test]
   fn test_error_code_sqlx_non_database() {
      // RowNotFound is not a database error, so no SQLite code
      let err = Error::Sqlx(sqlx::Error::RowNotFound);
      assert_eq!(err.error_code(), "SQLX_ERROR");
      assert!(!err.is_unique_violation());
   }
}
