//! phonebook CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use phonebook::{Cli, PhonebookConfig, Session};
use phonebook_conn_mgr::SqliteDatabase;
use phonebook_store::ContactStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
   init_tracing();

   match run(Cli::parse()).await {
      Ok(()) => ExitCode::SUCCESS,
      Err(e) => {
         eprintln!("phonebook: {e}");
         ExitCode::FAILURE
      }
   }
}

/// Logs go to stderr so they never interleave with the menu on stdout.
fn init_tracing() {
   let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
   tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();
}

async fn run(cli: Cli) -> phonebook::Result<()> {
   let config = PhonebookConfig::resolve(&cli)?;
   info!(
      "Using database {} and bulk load file {}",
      config.database.display(),
      config.csv.display()
   );

   let db = SqliteDatabase::connect(&config.database, Some(config.database_config())).await?;
   let store = ContactStore::new(db);
   store.ensure_schema().await?;

   let mut session = Session::new(
      store.clone(),
      config.csv.clone(),
      io::stdin().lock(),
      io::stdout().lock(),
   );
   let result = session.run().await;

   store.database().close().await?;
   result
}
