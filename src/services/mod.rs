//! Service layer for Tally
//!
//! The categorizer, import normalizer, duplicate detector and budget
//! aggregator are usable on their own; the `*Service` types wrap them with
//! storage, validation and audit logging.

pub mod budget;
pub mod categorizer;
pub mod duplicate;
pub mod import;
pub mod rules;
pub mod transaction;

pub use budget::{BudgetCheck, BudgetImpact, BudgetService, BudgetStatus, SetBudgetOutcome};
pub use categorizer::RuleEngine;
pub use import::{CsvNormalizer, ImportOptions, ImportService, ImportSummary};
pub use rules::RuleService;
pub use transaction::{AddOutcome, NewTransaction, TransactionFilter, TransactionService};
