//! Offset pagination over contacts in ascending `id` order.
//!
//! One row more than the page size is requested; if that sentinel row comes
//! back there is at least one more page, and it is dropped from the result.
//! Pages are not stable across concurrent writers.

use serde::Serialize;
use tracing::debug;

use crate::{Contact, ContactStore, Error, Result};

const SELECT_PAGE: &str =
   "SELECT id, first_name, phone FROM phonebook ORDER BY id ASC LIMIT ?1 OFFSET ?2";

/// One page of contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
   pub rows: Vec<Contact>,
   /// The requested limit
   pub limit: i64,
   /// The requested offset
   pub offset: i64,
   /// Whether rows exist past this page
   pub has_more: bool,
}

impl Page {
   fn empty(limit: i64, offset: i64) -> Self {
      Self {
         rows: Vec::new(),
         limit,
         offset,
         has_more: false,
      }
   }

   /// Offset of the following page, or `None` on the last page.
   pub fn next_offset(&self) -> Option<i64> {
      if self.has_more {
         Some(self.offset.saturating_add(self.limit))
      } else {
         None
      }
   }
}

/// Trim the sentinel row, if any, and report whether it was there.
pub(crate) fn split_sentinel(mut rows: Vec<Contact>, limit: i64) -> (Vec<Contact>, bool) {
   let limit = usize::try_from(limit).unwrap_or(usize::MAX);
   let has_more = rows.len() > limit;
   if has_more {
      rows.truncate(limit);
   }
   (rows, has_more)
}

impl ContactStore {
   /// Up to `limit` contacts in ascending `id` order, after skipping
   /// `offset` of them.
   ///
   /// A `limit` of zero or less yields an empty page without querying. A
   /// negative `offset` is an error. There is no upper bound on `limit`.
   pub async fn query_paginated(&self, limit: i64, offset: i64) -> Result<Page> {
      if offset < 0 {
         return Err(Error::NegativeOffset(offset));
      }
      if limit <= 0 {
         return Ok(Page::empty(limit, offset));
      }

      let pool = self.db.read_pool()?;
      let rows = sqlx::query_as::<_, Contact>(SELECT_PAGE)
         .bind(limit.saturating_add(1))
         .bind(offset)
         .fetch_all(pool)
         .await?;

      let (rows, has_more) = split_sentinel(rows, limit);
      debug!(
         "Page limit={limit} offset={offset} returned {} contact(s), has_more={has_more}",
         rows.len()
      );

      Ok(Page {
         rows,
         limit,
         offset,
         has_more,
      })
   }
}
