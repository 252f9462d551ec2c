//! Reading contacts from the semicolon-separated bulk load file.
//!
//! The first line is a header and is discarded. Every other line is
//! `first_name;phone`; fields are trimmed and extra fields are ignored.

use std::io::Read;
use std::path::Path;

use phonebook_store::NewContact;
use tracing::warn;

use crate::{Error, Result};

/// Contacts read from a bulk load file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CsvImport {
   pub contacts: Vec<NewContact>,
   /// Lines that were malformed or had fewer than two fields
   pub skipped_lines: usize,
}

/// Parse bulk load content from any reader.
pub fn parse_contacts<R: Read>(reader: R) -> csv::Result<CsvImport> {
   let mut reader = csv::ReaderBuilder::new()
      .delimiter(b';')
      .has_headers(true)
      .flexible(true)
      .trim(csv::Trim::All)
      .from_reader(reader);

   let mut import = CsvImport::default();
   for result in reader.records() {
      let record = match result {
         Ok(r) => r,
         Err(e) if e.is_io_error() => return Err(e),
         Err(e) => {
            warn!("Skipping malformed contact line: {e}");
            import.skipped_lines += 1;
            continue;
         }
      };

      match (record.get(0), record.get(1)) {
         (Some(first_name), Some(phone)) => {
            import.contacts.push(NewContact::new(first_name, phone));
         }
         _ => {
            let line = record.position().map_or(0, |p| p.line());
            warn!("Skipping line {line}: expected first_name;phone");
            import.skipped_lines += 1;
         }
      }
   }

   Ok(import)
}

/// Read and parse the bulk load file at `path`.
pub fn read_contacts(path: &Path) -> Result<CsvImport> {
   let file = std::fs::File::open(path)?;
   parse_contacts(file).map_err(|source| Error::Csv {
      path: path.to_path_buf(),
      source,
   })
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_header_is_discarded() {
      let content = "first_name;phone\nAnn;555-0100\nBob;555-0200\n";
      let import = parse_contacts(content.as_bytes()).unwrap();

      assert_eq!(
         import.contacts,
         vec![
            NewContact::new("Ann", "555-0100"),
            NewContact::new("Bob", "555-0200")
         ]
      );
      assert_eq!(import.skipped_lines, 0);
   }

   #[test]
   fn test_fields_are_trimmed_and_extras_ignored() {
      let content = "name;phone\n  Ann ; 555-0100 ;note\n";
      let import = parse_contacts(content.as_bytes()).unwrap();
      assert_eq!(import.contacts, vec![NewContact::new("Ann", "555-0100")]);
   }

   #[test]
   fn test_short_lines_are_skipped() {
      let content = "name;phone\nAnn\nBob;555-0200\n\n";
      let import = parse_contacts(content.as_bytes()).unwrap();

      assert_eq!(import.contacts, vec![NewContact::new("Bob", "555-0200")]);
      assert_eq!(import.skipped_lines, 1);
   }

   #[test]
   fn test_header_only_is_empty() {
      let import = parse_contacts("first_name;phone\n".as_bytes()).unwrap();
      assert_eq!(import, CsvImport::default());
   }

   #[test]
   fn test_missing_file() {
      let err = read_contacts(Path::new("/definitely/not/here.csv")).unwrap_err();
      assert_eq!(err.error_code(), "IO_ERROR");
   }
}
