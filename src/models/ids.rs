//! Strongly-typed ID wrappers for stored records
//!
//! Newtype wrappers keep transaction and budget IDs from being mixed up.
//! Listings show the short form (`txn-1a2b3c4d`); lookups accept either the
//! short form or the full UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Check whether a user-typed reference points at this ID
            ///
            /// Accepts the full UUID, the display form, or a bare hex prefix
            /// of at least four characters.
            pub fn matches_reference(&self, reference: &str) -> bool {
                let reference = reference.trim().to_lowercase();
                let reference = reference
                    .strip_prefix($display_prefix)
                    .unwrap_or(&reference);
                reference.len() >= 4 && self.0.to_string().starts_with(reference)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(BudgetId, "bud-");
