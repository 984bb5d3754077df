//! Display formatting for terminal output
//!
//! Tables, status blocks and the report bar chart printed by the CLI.

pub mod budget;
pub mod report;
pub mod rules;
pub mod transaction;

pub use budget::{budget_feedback, format_add_warning, format_budget_check, format_budget_list};
pub use report::{format_category_report, render_bar_chart, CategoryPalette, PALETTE};
pub use rules::format_rule_list;
pub use transaction::{format_transaction_details, format_transaction_table};
