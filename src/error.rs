use std::path::PathBuf;

/// Result type alias for the phonebook CLI.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the CLI shell.
///
/// Store errors pass through untouched so the menu can print them and carry
/// on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   #[error(transparent)]
   Store(#[from] phonebook_store::Error),

   #[error(transparent)]
   ConnectionManager(#[from] phonebook_conn_mgr::Error),

   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   #[error("could not read {}: {source}", .path.display())]
   Csv {
      path: PathBuf,
      #[source]
      source: csv::Error,
   },

   #[error("could not read config file {}: {message}", .path.display())]
   Config { path: PathBuf, message: String },

   /// Menu input that could not be understood.
   #[error("{0}")]
   InvalidInput(String),

   /// Input closed while a prompt was waiting.
   #[error("unexpected end of input")]
   EndOfInput,
}

impl Error {
   /// Machine-readable code, delegating to the store for database errors.
   pub fn error_code(&self) -> String {
      match self {
         Error::Store(e) => e.error_code(),
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::Io(_) => "IO_ERROR".to_string(),
         Error::Csv { .. } => "CSV_ERROR".to_string(),
         Error::Config { .. } => "CONFIG_ERROR".to_string(),
         Error::InvalidInput(_) => "INVALID_INPUT".to_string(),
         Error::EndOfInput => "END_OF_INPUT".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_store_errors_keep_their_code() {
      let err = Error::from(phonebook_store::Error::NegativeOffset(-1));
      assert_eq!(err.error_code(), "NEGATIVE_OFFSET");
      assert!(err.to_string().contains("-1"));
   }

   #[test]
   fn test_invalid_input_message() {
      let err = Error::InvalidInput("not a number: x".into());
      assert_eq!(err.error_code(), "INVALID_INPUT");
      assert_eq!(err.to_string(), "not a number: x");
   }
}
