use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::{Contact, ContactFilter, ContactStore, Result};

const SELECT_ALL: &str = "SELECT id, first_name, phone FROM phonebook";
const SELECT_BY_NAME: &str = "SELECT id, first_name, phone FROM phonebook WHERE first_name = ?1";
const SELECT_BY_PHONE: &str = "SELECT id, first_name, phone FROM phonebook WHERE phone = ?1";

impl ContactStore {
   /// Contacts matching `filter` exactly. Row order is whatever storage
   /// returns.
   pub async fn query_exact(&self, filter: &ContactFilter) -> Result<Vec<Contact>> {
      let pool = self.db.read_pool()?;

      let query = match filter {
         ContactFilter::All => sqlx::query_as::<_, Contact>(SELECT_ALL),
         ContactFilter::FirstName(first_name) => {
            sqlx::query_as::<_, Contact>(SELECT_BY_NAME).bind(first_name.as_str())
         }
         ContactFilter::Phone(phone) => {
            sqlx::query_as::<_, Contact>(SELECT_BY_PHONE).bind(phone.as_str())
         }
      };
      let contacts = query.fetch_all(pool).await?;

      debug!("Query {filter:?} returned {} contact(s)", contacts.len());
      Ok(contacts)
   }

   /// Contacts whose name or phone contains `pattern`, ignoring case for any
   /// Unicode letter.
   ///
   /// `%` and `_` in the pattern act as LIKE wildcards. SQLite's own `LIKE`
   /// only folds ASCII, so matching happens here instead of in SQL.
   pub async fn search_pattern(&self, pattern: &str) -> Result<Vec<Contact>> {
      let matcher = like_matcher(pattern)?;
      let pool = self.db.read_pool()?;
      let contacts: Vec<Contact> = sqlx::query_as::<_, Contact>(SELECT_ALL)
         .fetch_all(pool)
         .await?
         .into_iter()
         .filter(|c| matcher.is_match(&c.first_name) || matcher.is_match(&c.phone))
         .collect();

      debug!("Search {pattern:?} returned {} contact(s)", contacts.len());
      Ok(contacts)
   }
}

/// Unanchored, case-insensitive regex equivalent to `LIKE '%pattern%'`.
fn like_matcher(pattern: &str) -> Result<Regex> {
   let mut source = String::with_capacity(pattern.len() * 2);
   for ch in pattern.chars() {
      match ch {
         '%' => source.push_str(".*"),
         '_' => source.push('.'),
         other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
      }
   }

   let matcher = RegexBuilder::new(&source)
      .case_insensitive(true)
      .dot_matches_new_line(true)
      .build()?;
   Ok(matcher)
}
