//! Tally - terminal personal finance tracker
//!
//! Records income and expenses, categorizes them with regex rules, imports
//! bank CSV exports, tracks budgets over custom date ranges and reports
//! spending by category. Everything is stored as JSON files under a single
//! data directory.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: the `TallyError` type
//! - `models`: transactions, budgets, rules, money and date ranges
//! - `storage`: JSON repositories and the audit trail
//! - `services`: categorizer, CSV import, duplicate detection, budgets
//! - `reports`: per-category income and expense reports
//! - `display`: plain-text formatting for the CLI
//! - `cli`: command handlers
//! - `tui`: the interactive terminal interface
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::config::{Settings, TallyPaths};
//! use tally::storage::Storage;
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{TallyError, TallyResult};
