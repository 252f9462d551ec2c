//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use phonebook_conn_mgr::SqliteDatabaseConfig;
use serde::Deserialize;

use crate::{Error, Result};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "phonebook")]
#[command(about = "Interactive contact directory backed by SQLite", long_about = None)]
pub struct Cli {
   /// TOML file with any of the settings below
   #[arg(short, long, env = "PHONEBOOK_CONFIG")]
   pub config: Option<PathBuf>,

   /// SQLite database file (created if missing)
   #[arg(short, long, env = "PHONEBOOK_DATABASE")]
   pub database: Option<PathBuf>,

   /// Semicolon-separated file read by the bulk load menu entry
   #[arg(long, env = "PHONEBOOK_CSV")]
   pub csv: Option<PathBuf>,

   /// Maximum number of concurrent read connections
   #[arg(long, env = "PHONEBOOK_MAX_READ_CONNECTIONS")]
   pub max_read_connections: Option<u32>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhonebookConfig {
   pub database: PathBuf,
   pub csv: PathBuf,
   pub max_read_connections: u32,
   pub idle_timeout_secs: u64,
   pub acquire_timeout_secs: u64,
}

impl Default for PhonebookConfig {
   fn default() -> Self {
      let pool = SqliteDatabaseConfig::default();
      Self {
         database: PathBuf::from("phonebook.db"),
         csv: PathBuf::from("./data.csv"),
         max_read_connections: pool.max_read_connections,
         idle_timeout_secs: pool.idle_timeout.as_secs(),
         acquire_timeout_secs: pool.acquire_timeout.as_secs(),
      }
   }
}

impl PhonebookConfig {
   /// Parse a TOML document; `path` is only used in error messages.
   pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
      toml::from_str(contents).map_err(|e| Error::Config {
         path: path.to_path_buf(),
         message: e.to_string(),
      })
   }

   pub fn load(path: &Path) -> Result<Self> {
      let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
         path: path.to_path_buf(),
         message: e.to_string(),
      })?;
      Self::from_toml(&contents, path)
   }

   /// Resolve the final settings from parsed arguments.
   ///
   /// clap has already folded environment variables into `cli`, with flags
   /// taking precedence.
   pub fn resolve(cli: &Cli) -> Result<Self> {
      let mut config = match &cli.config {
         Some(path) => Self::load(path)?,
         None => Self::default(),
      };

      if let Some(database) = &cli.database {
         config.database = database.clone();
      }
      if let Some(csv) = &cli.csv {
         config.csv = csv.clone();
      }
      if let Some(max) = cli.max_read_connections {
         config.max_read_connections = max;
      }

      Ok(config)
   }

   /// Pool settings for the connection manager.
   pub fn database_config(&self) -> SqliteDatabaseConfig {
      SqliteDatabaseConfig {
         max_read_connections: self.max_read_connections,
         idle_timeout: Duration::from_secs(self.idle_timeout_secs),
         acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
      }
   }
}
