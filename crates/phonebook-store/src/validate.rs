//! Phone number shape checks.
//!
//! Only [`batch_upsert`](crate::ContactStore::batch_upsert) validates on its
//! own. The single-record operations write whatever they are given; callers
//! that want the check there call [`validate_phone`] first.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Optional leading `+`, then 7 to 15 digits, hyphens, spaces or parentheses.
static PHONE_PATTERN: LazyLock<Regex> =
   LazyLock::new(|| Regex::new(r"^\+?[0-9 ()-]{7,15}$").expect("phone pattern is valid"));

/// Whether `phone` has an acceptable shape.
pub fn is_valid_phone(phone: &str) -> bool {
   PHONE_PATTERN.is_match(phone)
}

/// Like [`is_valid_phone`], but as an error.
pub fn validate_phone(phone: &str) -> Result<()> {
   if is_valid_phone(phone) {
      Ok(())
   } else {
      Err(Error::InvalidPhone(phone.to_string()))
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_accepts_common_formats() {
      for phone in [
         "123-4567",
         "+1 555 0100",
         "(555) 123-4567",
         "5551234",
         "+441234567890",
         "123456789012345",
      ] {
         assert!(is_valid_phone(phone), "{phone} should be valid");
      }
   }

   #[test]
   fn test_rejects_bad_shapes() {
      for phone in [
         "bad",
         "",
         "123456",
         "1234567890123456",
         "555-CALL-NOW",
         "555.123.4567",
         "++15551234",
         "5551234+",
         "555_1234",
      ] {
         assert!(!is_valid_phone(phone), "{phone} should be invalid");
      }
   }

   #[test]
   fn test_plus_does_not_count_toward_length() {
      // 15 characters after the plus is still fine
      assert!(is_valid_phone("+123456789012345"));
      assert!(!is_valid_phone("+1234567890123456"));
      assert!(!is_valid_phone("+123456"));
   }

   #[test]
   fn test_validate_phone_error() {
      assert!(validate_phone("555-0100").is_ok());
      match validate_phone("abc") {
         Err(Error::InvalidPhone(p)) => assert_eq!(p, "abc"),
         other => panic!("expected InvalidPhone, got {other:?}"),
      }
   }
}
