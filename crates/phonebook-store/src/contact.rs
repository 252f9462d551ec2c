//! Contact records and the request/outcome types of the store operations.

use std::fmt;

use serde::Serialize;

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Contact {
   pub id: i64,
   pub first_name: String,
   pub phone: String,
}

impl fmt::Display for Contact {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "({}, {}, {})", self.id, self.first_name, self.phone)
   }
}

/// A candidate record that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContact {
   pub first_name: String,
   pub phone: String,
}

impl NewContact {
   pub fn new(first_name: impl Into<String>, phone: impl Into<String>) -> Self {
      Self {
         first_name: first_name.into(),
         phone: phone.into(),
      }
   }
}

impl fmt::Display for NewContact {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "({}, {})", self.first_name, self.phone)
   }
}

/// Fields to change on the contacts matched by an update.
///
/// `None` and the empty string both mean "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
   pub first_name: Option<String>,
   pub phone: Option<String>,
}

impl ContactChanges {
   pub(crate) fn first_name(&self) -> Option<&str> {
      self.first_name.as_deref().filter(|s| !s.is_empty())
   }

   pub(crate) fn phone(&self) -> Option<&str> {
      self.phone.as_deref().filter(|s| !s.is_empty())
   }
}

/// Which column an exact-match query filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactFilter {
   /// Every contact, in storage order
   All,
   FirstName(String),
   Phone(String),
}

/// Result of [`insert_ignore_duplicate`](crate::ContactStore::insert_ignore_duplicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum InsertOutcome {
   Inserted { id: i64 },
   /// The phone was already taken; nothing was written.
   DuplicatePhone,
}

/// Result of [`insert_many_ignore_duplicates`](crate::ContactStore::insert_many_ignore_duplicates).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkInsertSummary {
   pub inserted: u64,
   pub duplicates: u64,
}

/// Rows touched by each statement of an update-by-identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
   pub names_updated: u64,
   pub phones_updated: u64,
}

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum UpsertOutcome {
   /// Every contact with that name got the new phone.
   Updated { rows: u64 },
   Inserted { id: i64 },
}

/// A batch record that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
   pub record: NewContact,
   pub reason: RejectReason,
}

/// Why a batch record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RejectReason {
   /// Failed the phone shape check; storage was never touched.
   InvalidPhone,
   /// Storage refused the record, e.g. a phone owned by another name.
   Storage { code: String, message: String },
}

impl fmt::Display for RejectReason {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         RejectReason::InvalidPhone => f.write_str("invalid phone number"),
         RejectReason::Storage { code, message } => write!(f, "{message} ({code})"),
      }
   }
}
