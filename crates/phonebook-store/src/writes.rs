//! Insert, update, upsert, batch and delete operations.
//!
//! Each public operation takes the writer for its whole duration and commits
//! before returning. The batch is deliberately not atomic: every record runs
//! in its own savepoint, so a failing record is rolled back alone while the
//! records around it stay applied.

use sqlx::{Connection, SqliteConnection};
use tracing::{debug, warn};

use crate::validate::is_valid_phone;
use crate::{
   BulkInsertSummary, ContactChanges, ContactStore, InsertOutcome, NewContact, RejectReason,
   RejectedRecord, Result, UpdateSummary, UpsertOutcome,
};

const INSERT_IGNORE_DUPLICATE: &str =
   "INSERT INTO phonebook (first_name, phone) VALUES (?1, ?2) ON CONFLICT (phone) DO NOTHING";
const INSERT: &str = "INSERT INTO phonebook (first_name, phone) VALUES (?1, ?2)";
const FIND_ID_BY_NAME: &str = "SELECT id FROM phonebook WHERE first_name = ?1 LIMIT 1";
const UPDATE_PHONE_BY_NAME: &str = "UPDATE phonebook SET phone = ?1 WHERE first_name = ?2";
const UPDATE_NAME_BY_PHONE: &str = "UPDATE phonebook SET first_name = ?1 WHERE phone = ?2";
const UPDATE_PHONE_BY_PHONE: &str = "UPDATE phonebook SET phone = ?1 WHERE phone = ?2";
const DELETE_BY_NAME_OR_PHONE: &str = "DELETE FROM phonebook WHERE first_name = ?1 OR phone = ?1";

impl ContactStore {
   /// Insert a contact unless its phone is already taken, in which case
   /// nothing is written and no error is raised.
   ///
   /// The phone shape is not validated here.
   pub async fn insert_ignore_duplicate(&self, contact: &NewContact) -> Result<InsertOutcome> {
      let mut writer = self.db.acquire_writer().await?;
      let outcome = insert_ignoring_duplicate(&mut writer, contact).await?;
      debug!("Insert of {contact}: {outcome:?}");
      Ok(outcome)
   }

   /// Bulk-load path: [`insert_ignore_duplicate`](Self::insert_ignore_duplicate)
   /// for every contact, committed once at the end.
   ///
   /// Duplicate phones are counted and skipped. Any other storage error rolls
   /// the whole load back.
   pub async fn insert_many_ignore_duplicates(
      &self,
      contacts: &[NewContact],
   ) -> Result<BulkInsertSummary> {
      let mut writer = self.db.acquire_writer().await?;
      let mut tx = writer.begin().await?;

      let mut summary = BulkInsertSummary::default();
      for contact in contacts {
         match insert_ignoring_duplicate(&mut tx, contact).await? {
            InsertOutcome::Inserted { .. } => summary.inserted += 1,
            InsertOutcome::DuplicatePhone => summary.duplicates += 1,
         }
      }

      tx.commit().await?;
      debug!(
         "Bulk insert: {} inserted, {} duplicate(s) skipped",
         summary.inserted, summary.duplicates
      );
      Ok(summary)
   }

   /// Change the name and/or phone of the contacts whose phone equals
   /// `identifier`.
   ///
   /// The name is updated first, then the phone, as two statements in one
   /// transaction. Matching nothing is not an error.
   pub async fn update_by_identifier(
      &self,
      identifier: &str,
      changes: &ContactChanges,
   ) -> Result<UpdateSummary> {
      let mut summary = UpdateSummary::default();
      if changes.first_name().is_none() && changes.phone().is_none() {
         return Ok(summary);
      }

      let mut writer = self.db.acquire_writer().await?;
      let mut tx = writer.begin().await?;

      if let Some(first_name) = changes.first_name() {
         summary.names_updated = sqlx::query(UPDATE_NAME_BY_PHONE)
            .bind(first_name)
            .bind(identifier)
            .execute(&mut *tx)
            .await?
            .rows_affected();
      }

      if let Some(phone) = changes.phone() {
         summary.phones_updated = sqlx::query(UPDATE_PHONE_BY_PHONE)
            .bind(phone)
            .bind(identifier)
            .execute(&mut *tx)
            .await?
            .rows_affected();
      }

      tx.commit().await?;
      debug!("Update of {identifier}: {summary:?}");
      Ok(summary)
   }

   /// Set the phone of the contacts named `contact.first_name`, or insert a
   /// new contact when there is none.
   ///
   /// The insert has no duplicate-phone guard: a phone owned by another name
   /// fails with a UNIQUE violation (see [`Error::is_unique_violation`]).
   ///
   /// [`Error::is_unique_violation`]: crate::Error::is_unique_violation
   pub async fn upsert_by_name(&self, contact: &NewContact) -> Result<UpsertOutcome> {
      let mut writer = self.db.acquire_writer().await?;
      let mut tx = writer.begin().await?;
      let outcome = upsert_by_name_on(&mut tx, contact).await?;
      tx.commit().await?;

      debug!("Upsert of {contact}: {outcome:?}");
      Ok(outcome)
   }

   /// Upsert every record by name, best effort.
   ///
   /// Records with a badly shaped phone are rejected without touching
   /// storage. The rest are applied one by one; a record that storage refuses
   /// is rolled back alone and rejected. Returns the rejects in input order.
   /// Applied records stay applied regardless of what follows them.
   pub async fn batch_upsert(&self, records: Vec<NewContact>) -> Result<Vec<RejectedRecord>> {
      let mut writer = self.db.acquire_writer().await?;
      let mut tx = writer.begin().await?;

      let mut applied = 0usize;
      let mut rejected = Vec::new();
      for record in records {
         if !is_valid_phone(&record.phone) {
            warn!("Rejecting {record}: invalid phone number");
            rejected.push(RejectedRecord {
               record,
               reason: RejectReason::InvalidPhone,
            });
            continue;
         }

         match upsert_in_savepoint(&mut tx, &record).await {
            Ok(_) => applied += 1,
            Err(e) => {
               warn!("Rejecting {record}: {e}");
               rejected.push(RejectedRecord {
                  reason: RejectReason::Storage {
                     code: e.error_code(),
                     message: e.to_string(),
                  },
                  record,
               });
            }
         }
      }

      tx.commit().await?;
      debug!(
         "Batch upsert: {applied} applied, {} rejected",
         rejected.len()
      );
      Ok(rejected)
   }

   /// Delete every contact whose name or phone equals `identifier`.
   ///
   /// Returns the number of contacts removed, possibly zero.
   pub async fn delete_by_identifier(&self, identifier: &str) -> Result<u64> {
      let mut writer = self.db.acquire_writer().await?;
      let deleted = sqlx::query(DELETE_BY_NAME_OR_PHONE)
         .bind(identifier)
         .execute(&mut *writer)
         .await?
         .rows_affected();

      debug!("Deleted {deleted} contact(s) matching {identifier}");
      Ok(deleted)
   }
}

async fn insert_ignoring_duplicate(
   conn: &mut SqliteConnection,
   contact: &NewContact,
) -> Result<InsertOutcome> {
   let result = sqlx::query(INSERT_IGNORE_DUPLICATE)
      .bind(contact.first_name.as_str())
      .bind(contact.phone.as_str())
      .execute(&mut *conn)
      .await?;

   if result.rows_affected() == 0 {
      Ok(InsertOutcome::DuplicatePhone)
   } else {
      Ok(InsertOutcome::Inserted {
         id: result.last_insert_rowid(),
      })
   }
}

async fn upsert_by_name_on(
   conn: &mut SqliteConnection,
   contact: &NewContact,
) -> Result<UpsertOutcome> {
   let existing: Option<i64> = sqlx::query_scalar(FIND_ID_BY_NAME)
      .bind(contact.first_name.as_str())
      .fetch_optional(&mut *conn)
      .await?;

   if existing.is_some() {
      let rows = sqlx::query(UPDATE_PHONE_BY_NAME)
         .bind(contact.phone.as_str())
         .bind(contact.first_name.as_str())
         .execute(&mut *conn)
         .await?
         .rows_affected();
      return Ok(UpsertOutcome::Updated { rows });
   }

   let result = sqlx::query(INSERT)
      .bind(contact.first_name.as_str())
      .bind(contact.phone.as_str())
      .execute(&mut *conn)
      .await?;
   Ok(UpsertOutcome::Inserted {
      id: result.last_insert_rowid(),
   })
}

/// Dropping the savepoint without committing rolls back just this record.
async fn upsert_in_savepoint(
   conn: &mut SqliteConnection,
   record: &NewContact,
) -> Result<UpsertOutcome> {
   let mut savepoint = conn.begin().await?;
   let outcome = upsert_by_name_on(&mut savepoint, record).await?;
   savepoint.commit().await?;
   Ok(outcome)
}
