//! Event handler for the TUI
//!
//! Routes key events to the open dialog, an active text field, or the
//! current screen.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::app::{ActiveDialog, ActiveView, App, ConfirmAction, FocusedPanel, InputMode, StatusLevel};
use super::event::Event;
use super::views::{budgets, transactions};
use crate::display::report::truncate;
use crate::services::{BudgetService, TransactionService};

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick | Event::Resize(_, _) => Ok(()),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Ok(());
    }

    if app.has_dialog() {
        return handle_dialog_key(app, key);
    }

    if app.ledger.searching {
        handle_search_key(app, key);
        return Ok(());
    }

    if app.rules_view.testing {
        handle_tester_key(app, key);
        return Ok(());
    }

    handle_normal_key(app, key)
}

/// Handle keys in normal mode
fn handle_normal_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.quit();
            return Ok(());
        }
        KeyCode::Char('?') => {
            app.open_dialog(ActiveDialog::Help);
            return Ok(());
        }
        KeyCode::Tab => {
            app.toggle_panel_focus();
            return Ok(());
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.focused_panel = FocusedPanel::Sidebar;
            return Ok(());
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.focused_panel = FocusedPanel::Main;
            return Ok(());
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.switch_view(ActiveView::ALL[index]);
            return Ok(());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            return Ok(());
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let max = row_count(app);
            app.move_down(max);
            return Ok(());
        }
        _ => {}
    }

    match app.active_view {
        ActiveView::Transactions => handle_transactions_key(app, key),
        ActiveView::Budgets => handle_budgets_key(app, key),
        ActiveView::IncomeReport | ActiveView::ExpenseReport => handle_report_key(app, key),
        ActiveView::Rules => handle_rules_key(app, key),
    }
    Ok(())
}

/// Number of selectable rows on the current screen
fn row_count(app: &App) -> usize {
    match app.active_view {
        ActiveView::Transactions => transactions::visible_transactions(app).len(),
        ActiveView::Budgets => budgets::budget_rows(app).len(),
        ActiveView::Rules => app.engine.len(),
        ActiveView::IncomeReport | ActiveView::ExpenseReport => 0,
    }
}

fn handle_transactions_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => app.open_dialog(ActiveDialog::AddTransaction),
        KeyCode::Char('d') | KeyCode::Delete => {
            let visible = transactions::visible_transactions(app);
            if let Some(txn) = visible.get(app.ledger.selected) {
                app.open_dialog(ActiveDialog::Confirm(ConfirmAction::DeleteTransaction {
                    id: txn.id,
                    label: truncate(&txn.description, 30),
                }));
            }
        }
        KeyCode::Char('f') => app.ledger.cycle_kind(),
        KeyCode::Char('o') => app.ledger.cycle_sort(),
        KeyCode::Char('O') => app.ledger.toggle_direction(),
        KeyCode::Char('/') => {
            app.ledger.start_search();
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('x') => app.ledger.clear_filters(),
        KeyCode::Char('g') | KeyCode::Home => app.ledger.selected = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.ledger.selected = row_count(app).saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_budgets_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('a') => app.open_dialog(ActiveDialog::SetBudget),
        KeyCode::Char('d') | KeyCode::Delete => {
            let rows = budgets::budget_rows(app);
            if let Some((budget, _)) = rows.get(app.selected_budget_index) {
                app.open_dialog(ActiveDialog::Confirm(ConfirmAction::DeleteBudget {
                    id: budget.id,
                    label: budget.category.clone(),
                }));
            }
        }
        _ => {}
    }
}

fn handle_report_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('p') => app.cycle_report_period(),
        KeyCode::Char('a') => app.open_dialog(ActiveDialog::AddTransaction),
        _ => {}
    }
}

fn handle_rules_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('t') {
        app.rules_view.start_testing();
        app.input_mode = InputMode::Editing;
    }
}

/// Keys while typing in the transaction search box
fn handle_search_key(app: &mut App, key: KeyEvent) {
    let search = &mut app.ledger.search;
    match key.code {
        KeyCode::Enter => {
            app.ledger.finish_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            search.clear();
            app.ledger.finish_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => search.backspace(),
        KeyCode::Delete => search.delete(),
        KeyCode::Left => search.move_left(),
        KeyCode::Right => search.move_right(),
        KeyCode::Home => search.move_start(),
        KeyCode::End => search.move_end(),
        KeyCode::Char(c) => {
            search.insert(c);
            app.ledger.selected = 0;
        }
        _ => {}
    }
}

/// Keys while typing in the rule tester
fn handle_tester_key(app: &mut App, key: KeyEvent) {
    let tester = &mut app.rules_view.tester;
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.rules_view.stop_testing();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => tester.backspace(),
        KeyCode::Delete => tester.delete(),
        KeyCode::Left => tester.move_left(),
        KeyCode::Right => tester.move_right(),
        KeyCode::Home => tester.move_start(),
        KeyCode::End => tester.move_end(),
        KeyCode::Char(c) => tester.insert(c),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match &app.active_dialog {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::AddTransaction => super::dialogs::transaction::handle_key(app, key),
        ActiveDialog::SetBudget => super::dialogs::budget::handle_key(app, key),
        ActiveDialog::Confirm(action) => {
            let action = action.clone();
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.close_dialog();
                    execute_confirmed_action(app, action);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
                _ => {}
            }
        }
        ActiveDialog::None => {}
    }
    Ok(())
}

/// Carry out a confirmed deletion and report the result
fn execute_confirmed_action(app: &mut App, action: ConfirmAction) {
    debug!(?action, "confirmed");

    let result = match action {
        ConfirmAction::DeleteTransaction { id, .. } => {
            TransactionService::reader(app.storage)
                .delete(&id.to_string())
                .map(|txn| format!("Deleted transaction '{}'", txn.description))
        }
        ConfirmAction::DeleteBudget { id, .. } => BudgetService::new(app.storage)
            .delete_by_id(id)
            .map(|budget| format!("Deleted budget for '{}'", budget.category)),
    };

    match result {
        Ok(message) => app.set_status_level(StatusLevel::Success, message),
        Err(e) => app.set_status_level(StatusLevel::Error, e.to_string()),
    }
}
