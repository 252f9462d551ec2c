//! The numbered menu loop.
//!
//! Each entry prompts for its inputs, runs one store operation and prints the
//! outcome. A failed operation is printed and the loop carries on; only end of
//! input or a broken output stream ends it early.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use phonebook_store::{
   Contact, ContactChanges, ContactFilter, ContactStore, InsertOutcome, NewContact,
   UpsertOutcome,
};
use tracing::debug;

use crate::csv_import::read_contacts;
use crate::{Error, Result};

const MENU: &str = "\
PhoneBook Menu
1. Insert from CSV
2. Insert from Console
3. Update Entry
4. Query PhoneBook
5. Delete Entry
6. Search by Pattern
7. Insert or Update User
8. Insert Many Users
9. Paginated Query
10. Exit";

/// An entry of the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
   LoadCsv,
   InsertFromConsole,
   Update,
   Query,
   Delete,
   Search,
   Upsert,
   BatchUpsert,
   Paginate,
   Exit,
}

impl FromStr for MenuChoice {
   type Err = Error;

   fn from_str(s: &str) -> Result<Self> {
      Ok(match s.trim() {
         "1" => MenuChoice::LoadCsv,
         "2" => MenuChoice::InsertFromConsole,
         "3" => MenuChoice::Update,
         "4" => MenuChoice::Query,
         "5" => MenuChoice::Delete,
         "6" => MenuChoice::Search,
         "7" => MenuChoice::Upsert,
         "8" => MenuChoice::BatchUpsert,
         "9" => MenuChoice::Paginate,
         "10" => MenuChoice::Exit,
         other => return Err(Error::InvalidInput(format!("invalid choice {other:?}"))),
      })
   }
}

/// Parse a filter field name into a filter, given the value for it.
fn filter_for(field: &str, value: String) -> Result<ContactFilter> {
   match field {
      "first_name" => Ok(ContactFilter::FirstName(value)),
      "phone" => Ok(ContactFilter::Phone(value)),
      other => Err(Error::InvalidInput(format!(
         "unknown filter field {other:?}, expected first_name, phone or none"
      ))),
   }
}

fn parse_number<T: FromStr>(input: &str, what: &str) -> Result<T> {
   input
      .trim()
      .parse()
      .map_err(|_| Error::InvalidInput(format!("{what} must be a whole number, got {input:?}")))
}

fn non_empty(input: String) -> Option<String> {
   if input.is_empty() { None } else { Some(input) }
}

/// An interactive session over a store, reading from `input` and printing
/// to `output`.
pub struct Session<R, W> {
   store: ContactStore,
   csv_path: PathBuf,
   input: R,
   output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
   pub fn new(store: ContactStore, csv_path: PathBuf, input: R, output: W) -> Self {
      Self {
         store,
         csv_path,
         input,
         output,
      }
   }

   /// Run the menu until the user exits or input ends.
   pub async fn run(&mut self) -> Result<()> {
      loop {
         writeln!(self.output, "\n{MENU}")?;
         let line = match self.prompt("Choose an option: ") {
            Ok(line) => line,
            Err(Error::EndOfInput) => return Ok(()),
            Err(e) => return Err(e),
         };

         let Ok(choice) = line.parse::<MenuChoice>() else {
            writeln!(self.output, "Invalid choice")?;
            continue;
         };
         if choice == MenuChoice::Exit {
            return Ok(());
         }

         match self.dispatch(choice).await {
            Ok(()) => {}
            Err(Error::EndOfInput) => return Ok(()),
            Err(e) => {
               debug!("{choice:?} failed with {}", e.error_code());
               writeln!(self.output, "Error: {e}")?;
            }
         }
      }
   }

   async fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
      match choice {
         MenuChoice::LoadCsv => self.load_csv().await,
         MenuChoice::InsertFromConsole => self.insert_from_console().await,
         MenuChoice::Update => self.update().await,
         MenuChoice::Query => self.query().await,
         MenuChoice::Delete => self.delete().await,
         MenuChoice::Search => self.search().await,
         MenuChoice::Upsert => self.upsert().await,
         MenuChoice::BatchUpsert => self.batch_upsert().await,
         MenuChoice::Paginate => self.paginate().await,
         MenuChoice::Exit => Ok(()),
      }
   }

   async fn load_csv(&mut self) -> Result<()> {
      let import = read_contacts(&self.csv_path)?;
      let summary = self
         .store
         .insert_many_ignore_duplicates(&import.contacts)
         .await?;

      writeln!(
         self.output,
         "Loaded {} contact(s) from {}; {} duplicate phone(s) and {} malformed line(s) skipped",
         summary.inserted,
         self.csv_path.display(),
         summary.duplicates,
         import.skipped_lines
      )?;
      Ok(())
   }

   async fn insert_from_console(&mut self) -> Result<()> {
      let first_name = self.prompt("First name: ")?;
      let phone = self.prompt("Phone: ")?;

      match self
         .store
         .insert_ignore_duplicate(&NewContact::new(first_name, phone))
         .await?
      {
         InsertOutcome::Inserted { id } => writeln!(self.output, "Inserted contact {id}")?,
         InsertOutcome::DuplicatePhone => {
            writeln!(self.output, "Phone already exists, nothing inserted")?
         }
      }
      Ok(())
   }

   async fn update(&mut self) -> Result<()> {
      let identifier = self.prompt("Enter the phone of the user to update: ")?;
      let first_name = self.prompt("Enter new first name (or press Enter to skip): ")?;
      let phone = self.prompt("Enter new phone (or press Enter to skip): ")?;
      let changes = ContactChanges {
         first_name: non_empty(first_name),
         phone: non_empty(phone),
      };

      let summary = self
         .store
         .update_by_identifier(&identifier, &changes)
         .await?;
      writeln!(
         self.output,
         "Updated {} name(s) and {} phone(s)",
         summary.names_updated, summary.phones_updated
      )?;
      Ok(())
   }

   async fn query(&mut self) -> Result<()> {
      let field = self.prompt("Filter by (first_name/phone/none): ")?;
      let field = field.trim();
      let filter = if field.is_empty() || field == "none" {
         ContactFilter::All
      } else {
         let value = self.prompt(&format!("Enter value for {field}: "))?;
         filter_for(field, value)?
      };

      let contacts = self.store.query_exact(&filter).await?;
      self.print_contacts(&contacts)
   }

   async fn delete(&mut self) -> Result<()> {
      let identifier = self.prompt("Enter first name or phone to delete: ")?;
      let deleted = self.store.delete_by_identifier(&identifier).await?;
      writeln!(self.output, "Deleted {deleted} contact(s)")?;
      Ok(())
   }

   async fn search(&mut self) -> Result<()> {
      let pattern = self.prompt("Enter search pattern (name or phone): ")?;
      let contacts = self.store.search_pattern(&pattern).await?;
      self.print_contacts(&contacts)
   }

   async fn upsert(&mut self) -> Result<()> {
      let first_name = self.prompt("Enter name: ")?;
      let phone = self.prompt("Enter phone: ")?;

      let contact = NewContact::new(first_name, phone);
      match self.store.upsert_by_name(&contact).await? {
         UpsertOutcome::Updated { .. } => {
            writeln!(self.output, "Updated phone for {}", contact.first_name)?
         }
         UpsertOutcome::Inserted { .. } => {
            writeln!(self.output, "Inserted new user {}", contact.first_name)?
         }
      }
      Ok(())
   }

   async fn batch_upsert(&mut self) -> Result<()> {
      let count = self.prompt("How many users to insert? ")?;
      let count: usize = parse_number(&count, "count")?;

      let mut records = Vec::with_capacity(count);
      for _ in 0..count {
         let first_name = self.prompt("Name: ")?;
         let phone = self.prompt("Phone: ")?;
         records.push(NewContact::new(first_name, phone));
      }

      let rejected = self.store.batch_upsert(records).await?;
      if rejected.is_empty() {
         writeln!(self.output, "All {count} user(s) saved")?;
         return Ok(());
      }

      writeln!(self.output, "Incorrect entries:")?;
      for reject in &rejected {
         writeln!(self.output, "{} - {}", reject.record, reject.reason)?;
      }
      Ok(())
   }

   async fn paginate(&mut self) -> Result<()> {
      let limit = self.prompt("Enter limit: ")?;
      let limit: i64 = parse_number(&limit, "limit")?;
      let offset = self.prompt("Enter offset: ")?;
      let offset: i64 = parse_number(&offset, "offset")?;

      let page = self.store.query_paginated(limit, offset).await?;
      self.print_contacts(&page.rows)?;
      if let Some(next) = page.next_offset() {
         writeln!(self.output, "More contacts from offset {next}")?;
      }
      Ok(())
   }

   fn print_contacts(&mut self, contacts: &[Contact]) -> Result<()> {
      if contacts.is_empty() {
         writeln!(self.output, "No contacts found")?;
      }
      for contact in contacts {
         writeln!(self.output, "{contact}")?;
      }
      Ok(())
   }

   /// Print `label` and read one line without its line ending.
   fn prompt(&mut self, label: &str) -> Result<String> {
      write!(self.output, "{label}")?;
      self.output.flush()?;

      let mut line = String::new();
      if self.input.read_line(&mut line)? == 0 {
         return Err(Error::EndOfInput);
      }
      Ok(line.trim_end_matches(['\r', '\n']).to_string())
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;

   use phonebook_conn_mgr::SqliteDatabase;

   use super::*;

   async fn memory_store() -> ContactStore {
      let db: Arc<SqliteDatabase> = SqliteDatabase::connect_in_memory().await.unwrap();
      let store = ContactStore::new(db);
      store.ensure_schema().await.unwrap();
      store
   }

   /// Feed `script` to a session and return everything it printed.
   async fn run_script(store: &ContactStore, csv_path: PathBuf, script: &str) -> String {
      let mut output = Vec::new();
      let mut session = Session::new(store.clone(), csv_path, script.as_bytes(), &mut output);
      session.run().await.unwrap();
      String::from_utf8(output).unwrap()
   }

   async fn sorted_contacts(store: &ContactStore) -> Vec<(String, String)> {
      let mut contacts = store.query_exact(&ContactFilter::All).await.unwrap();
      contacts.sort_by_key(|c| c.id);
      contacts
         .into_iter()
         .map(|c| (c.first_name, c.phone))
         .collect()
   }

   #[test]
   fn test_menu_choice_parsing() {
      assert_eq!("1".parse::<MenuChoice>().unwrap(), MenuChoice::LoadCsv);
      assert_eq!(" 9 ".parse::<MenuChoice>().unwrap(), MenuChoice::Paginate);
      assert_eq!("10".parse::<MenuChoice>().unwrap(), MenuChoice::Exit);
      assert!("0".parse::<MenuChoice>().is_err());
      assert!("exit".parse::<MenuChoice>().is_err());
   }

   #[test]
   fn test_filter_for() {
      assert_eq!(
         filter_for("phone", "555".into()).unwrap(),
         ContactFilter::Phone("555".into())
      );
      assert!(matches!(
         filter_for("email", "x".into()),
         Err(Error::InvalidInput(_))
      ));
   }

   #[tokio::test]
   async fn test_exit_and_end_of_input() {
      let store = memory_store().await;

      let output = run_script(&store, PathBuf::new(), "10\n").await;
      assert_eq!(output.matches("PhoneBook Menu").count(), 1);

      let output = run_script(&store, PathBuf::new(), "").await;
      assert!(output.contains("Choose an option: "));
   }

   #[tokio::test]
   async fn test_invalid_choice_keeps_looping() {
      let store = memory_store().await;
      let output = run_script(&store, PathBuf::new(), "42\n10\n").await;

      assert!(output.contains("Invalid choice"));
      assert_eq!(output.matches("PhoneBook Menu").count(), 2);
   }

   #[tokio::test]
   async fn test_console_insert_update_query_delete() {
      let store = memory_store().await;
      let script = "\
2\nAnn\n555-0100\n\
2\nImpostor\n555-0100\n\
3\n555-0100\nAnna\n\n\
4\nfirst_name\nAnna\n\
5\nAnna\n\
4\nnone\n\
10\n";
      let output = run_script(&store, PathBuf::new(), script).await;

      assert!(output.contains("Inserted contact 1"));
      assert!(output.contains("Phone already exists, nothing inserted"));
      assert!(output.contains("Updated 1 name(s) and 0 phone(s)"));
      assert!(output.contains("(1, Anna, 555-0100)"));
      assert!(output.contains("Deleted 1 contact(s)"));
      assert!(output.contains("No contacts found"));
   }

   #[tokio::test]
   async fn test_upsert_and_batch_report() {
      let store = memory_store().await;
      let script = "\
7\nAlice\n111-1111\n\
7\nAlice\n222-2222\n\
8\n3\nA\n123-4567\nB\nbad\nC\n+1 555 0100\n\
10\n";
      let output = run_script(&store, PathBuf::new(), script).await;

      assert!(output.contains("Inserted new user Alice"));
      assert!(output.contains("Updated phone for Alice"));
      assert!(output.contains("Incorrect entries:"));
      assert!(output.contains("(B, bad) - invalid phone number"));
      assert_eq!(
         sorted_contacts(&store).await,
         vec![
            ("Alice".to_string(), "222-2222".to_string()),
            ("A".to_string(), "123-4567".to_string()),
            ("C".to_string(), "+1 555 0100".to_string()),
         ]
      );
   }

   #[tokio::test]
   async fn test_failures_are_printed_not_fatal() {
      let store = memory_store().await;
      let script = "\
7\nAlice\n111\n\
7\nBob\n111\n\
9\nten\n\
9\n2\n-1\n\
4\nemail\nx\n\
8\nmany\n\
6\nali\n\
10\n";
      let output = run_script(&store, PathBuf::new(), script).await;

      // Bob's insert collides with Alice's phone
      assert!(output.contains("UNIQUE constraint failed"));
      assert!(output.contains("Error: limit must be a whole number"));
      assert!(output.contains("Error: page offset must not be negative"));
      assert!(output.contains("Error: unknown filter field \"email\""));
      assert!(output.contains("Error: count must be a whole number"));
      // The loop survived all of that
      assert!(output.contains("(1, Alice, 111)"));
   }

   #[tokio::test]
   async fn test_paginate_reports_next_offset() {
      let store = memory_store().await;
      for i in 1..=5 {
         store
            .insert_ignore_duplicate(&NewContact::new(format!("C{i}"), format!("{i}")))
            .await
            .unwrap();
      }

      let output = run_script(&store, PathBuf::new(), "9\n2\n1\n10\n").await;
      assert!(output.contains("(2, C2, 2)"));
      assert!(output.contains("(3, C3, 3)"));
      assert!(!output.contains("(4, C4, 4)"));
      assert!(output.contains("More contacts from offset 3"));
   }

   #[tokio::test]
   async fn test_load_csv() {
      let store = memory_store().await;
      let dir = tempfile::TempDir::new().unwrap();
      let csv_path = dir.path().join("data.csv");
      std::fs::write(
         &csv_path,
         "first_name;phone\nAnn;111\nBob;222\nDup;111\nbroken\n",
      )
      .unwrap();

      let output = run_script(&store, csv_path, "1\n10\n").await;

      assert!(output.contains("Loaded 2 contact(s)"));
      assert!(output.contains("1 duplicate phone(s) and 1 malformed line(s) skipped"));
      assert_eq!(
         sorted_contacts(&store).await,
         vec![
            ("Ann".to_string(), "111".to_string()),
            ("Bob".to_string(), "222".to_string()),
         ]
      );
   }

   #[tokio::test]
   async fn test_load_missing_csv_is_reported() {
      let store = memory_store().await;
      let output = run_script(&store, PathBuf::from("/definitely/not/here.csv"), "1\n10\n").await;
      assert!(output.contains("Error: io error"));
   }
}
