use tracing::debug;

use crate::{ContactStore, Result};

/// SQLite does not enforce `VARCHAR(n)`, so the length bounds are CHECKs.
const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS phonebook (
   id INTEGER PRIMARY KEY AUTOINCREMENT,
   first_name TEXT NOT NULL CHECK (length(first_name) <= 50),
   phone TEXT NOT NULL UNIQUE CHECK (length(phone) <= 15)
)
"#;

impl ContactStore {
   /// Create the contact table unless it already exists.
   pub async fn ensure_schema(&self) -> Result<()> {
      let mut writer = self.db.acquire_writer().await?;
      sqlx::query(CREATE_TABLE).execute(&mut *writer).await?;
      debug!("Ensured table phonebook exists");
      Ok(())
   }
}
