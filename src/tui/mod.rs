//! Terminal user interface
//!
//! A ratatui front end over the same services as the CLI: the ledger,
//! budgets, income and expense reports, and the categorization rules.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
