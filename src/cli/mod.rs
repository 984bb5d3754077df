//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod import;
pub mod report;
pub mod rules;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportArgs};
pub use rules::{handle_rules_command, RuleCommands};
pub use transaction::{
    handle_add_command, handle_delete_command, handle_list_command, handle_search_command,
    AddArgs, ListArgs,
};
