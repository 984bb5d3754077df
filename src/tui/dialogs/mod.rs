//! Modal dialogs for the TUI

pub mod budget;
pub mod confirm;
pub mod help;
pub mod transaction;
