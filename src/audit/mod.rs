//! Audit logging for Tally
//!
//! Every create, update and delete of a transaction, budget or custom rule is
//! appended to `audit.log` as a JSON line with before/after snapshots.
//!
//! ```rust,ignore
//! use tally::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Budget,
//!     budget.id.to_string(),
//!     Some(budget.category.clone()),
//!     &budget,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
