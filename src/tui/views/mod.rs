//! TUI Views module
//!
//! Contains the main screens (transactions, budgets, reports, rules) as well
//! as the sidebar and status bar.

pub mod budgets;
pub mod report;
pub mod rules;
pub mod sidebar;
pub mod status_bar;
pub mod transactions;

use ratatui::Frame;

use crate::models::TransactionType;

use super::app::{ActiveDialog, ActiveView, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    sidebar::render(frame, app, layout.sidebar);

    match app.active_view {
        ActiveView::Transactions => transactions::render(frame, app, layout.main),
        ActiveView::Budgets => budgets::render(frame, app, layout.main),
        ActiveView::IncomeReport => {
            report::render(frame, app, layout.main, TransactionType::Income)
        }
        ActiveView::ExpenseReport => {
            report::render(frame, app, layout.main, TransactionType::Expense)
        }
        ActiveView::Rules => rules::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &mut App) {
    match &app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame, app),
        ActiveDialog::AddTransaction => dialogs::transaction::render(frame, app),
        ActiveDialog::SetBudget => dialogs::budget::render(frame, app),
        ActiveDialog::Confirm(action) => dialogs::confirm::render(frame, action),
        ActiveDialog::None => {}
    }
}
