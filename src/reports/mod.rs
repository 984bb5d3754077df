//! Reports module for Tally
//!
//! Income and expense breakdowns by category.

pub mod category;

pub use category::{CategoryReport, CategoryTotal};
