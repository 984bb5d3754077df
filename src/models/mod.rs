//! Core data models for Tally
//!
//! Transactions, budgets, categorization rules, and the value types they are
//! built from (money, IDs, date ranges).

pub mod budget;
pub mod category_rule;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{Budget, BudgetValidationError};
pub use category_rule::{default_rules, CategoryRule};
pub use ids::{BudgetId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use period::{DateRange, PeriodError, ReportPeriod};
pub use transaction::{Transaction, TransactionType, TransactionValidationError, UNCATEGORIZED};
