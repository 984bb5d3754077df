//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use ratatui::style::Color;

use crate::config::Settings;
use crate::models::{BudgetId, ReportPeriod, TransactionId};
use crate::services::RuleEngine;
use crate::storage::Storage;

use super::dialogs::budget::BudgetFormState;
use super::dialogs::transaction::TransactionFormState;
use super::views::rules::RulesViewState;
use super::views::transactions::LedgerState;

/// How long a status message stays in the status bar
pub const STATUS_TTL: Duration = Duration::from_secs(8);

/// Which screen is shown in the main panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Transactions,
    Budgets,
    IncomeReport,
    ExpenseReport,
    Rules,
}

impl ActiveView {
    /// Sidebar menu order
    pub const ALL: [ActiveView; 5] = [
        Self::Transactions,
        Self::Budgets,
        Self::IncomeReport,
        Self::ExpenseReport,
        Self::Rules,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Budgets => "Budgets",
            Self::IncomeReport => "Income Report",
            Self::ExpenseReport => "Expense Report",
            Self::Rules => "Category Rules",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which panel currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Sidebar,
    Main,
}

/// Mode of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keys go to a text field
    Editing,
}

/// Destructive action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTransaction { id: TransactionId, label: String },
    DeleteBudget { id: BudgetId, label: String },
}

impl ConfirmAction {
    pub fn message(&self) -> String {
        match self {
            Self::DeleteTransaction { label, .. } => format!("Delete transaction '{}'?", label),
            Self::DeleteBudget { label, .. } => format!("Delete budget for '{}'?", label),
        }
    }
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    AddTransaction,
    SetBudget,
    Confirm(ConfirmAction),
}

/// Severity of a status bar message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// A message shown in the status bar until it expires
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub created_at: Instant,
}

/// Main application state
pub struct App<'a> {
    /// The storage layer
    pub storage: &'a Storage,

    /// Application settings
    pub settings: &'a Settings,

    /// Default plus custom categorization rules
    pub engine: RuleEngine,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Currently active view
    pub active_view: ActiveView,

    /// Which panel is focused
    pub focused_panel: FocusedPanel,

    /// Current input mode
    pub input_mode: InputMode,

    /// Currently active dialog
    pub active_dialog: ActiveDialog,

    /// Filter, sort, search and selection for the transactions table
    pub ledger: LedgerState,

    /// Selected row in the budgets table
    pub selected_budget_index: usize,

    /// Period shown by both category reports
    pub report_period: ReportPeriod,

    /// Rule list selection and the description tester
    pub rules_view: RulesViewState,

    /// Status message to display
    pub status: Option<StatusMessage>,

    /// Add Transaction form
    pub transaction_form: TransactionFormState,

    /// Set Budget form
    pub budget_form: BudgetFormState,
}

impl<'a> App<'a> {
    /// Create a new App instance
    pub fn new(storage: &'a Storage, settings: &'a Settings, engine: RuleEngine) -> Self {
        Self {
            storage,
            settings,
            engine,
            should_quit: false,
            active_view: ActiveView::default(),
            focused_panel: FocusedPanel::default(),
            input_mode: InputMode::default(),
            active_dialog: ActiveDialog::default(),
            ledger: LedgerState::default(),
            selected_budget_index: 0,
            report_period: ReportPeriod::default(),
            rules_view: RulesViewState::default(),
            status: None,
            transaction_form: TransactionFormState::new(),
            budget_form: BudgetFormState::new(),
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Set an informational status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.set_status_level(StatusLevel::Info, message);
    }

    pub fn set_status_level(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: message.into(),
            level,
            created_at: Instant::now(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Drop the status message once it is older than [`STATUS_TTL`]
    pub fn expire_status(&mut self, now: Instant) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| now.duration_since(s.created_at) >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    /// Switch to a different view
    pub fn switch_view(&mut self, view: ActiveView) {
        if self.active_view == view {
            return;
        }
        self.active_view = view;

        match view {
            ActiveView::Transactions => self.ledger.selected = 0,
            ActiveView::Budgets => self.selected_budget_index = 0,
            ActiveView::Rules => self.rules_view.selected = 0,
            ActiveView::IncomeReport | ActiveView::ExpenseReport => {}
        }
    }

    /// Toggle focus between sidebar and main panel
    pub fn toggle_panel_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Sidebar => FocusedPanel::Main,
            FocusedPanel::Main => FocusedPanel::Sidebar,
        };
    }

    /// Open a dialog, resetting its form
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        match &dialog {
            ActiveDialog::AddTransaction => {
                self.transaction_form = TransactionFormState::new();
                self.input_mode = InputMode::Editing;
            }
            ActiveDialog::SetBudget => {
                self.budget_form = BudgetFormState::for_month(self.today(), self.settings);
                self.input_mode = InputMode::Editing;
            }
            _ => {}
        }
        self.active_dialog = dialog;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
        self.input_mode = InputMode::Normal;
    }

    /// Check if a dialog is active
    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    /// Move selection up in the current view
    pub fn move_up(&mut self) {
        match self.focused_panel {
            FocusedPanel::Sidebar => self.switch_view(self.active_view.prev()),
            FocusedPanel::Main => match self.active_view {
                ActiveView::Transactions => {
                    self.ledger.selected = self.ledger.selected.saturating_sub(1);
                }
                ActiveView::Budgets => {
                    self.selected_budget_index = self.selected_budget_index.saturating_sub(1);
                }
                ActiveView::Rules => {
                    self.rules_view.selected = self.rules_view.selected.saturating_sub(1);
                }
                ActiveView::IncomeReport | ActiveView::ExpenseReport => {}
            },
        }
    }

    /// Move selection down in the current view, staying below `max`
    pub fn move_down(&mut self, max: usize) {
        let step = |index: &mut usize| {
            if *index < max.saturating_sub(1) {
                *index += 1;
            }
        };

        match self.focused_panel {
            FocusedPanel::Sidebar => self.switch_view(self.active_view.next()),
            FocusedPanel::Main => match self.active_view {
                ActiveView::Transactions => step(&mut self.ledger.selected),
                ActiveView::Budgets => step(&mut self.selected_budget_index),
                ActiveView::Rules => step(&mut self.rules_view.selected),
                ActiveView::IncomeReport | ActiveView::ExpenseReport => {}
            },
        }
    }

    /// Advance the report period: month, year, all
    pub fn cycle_report_period(&mut self) {
        self.report_period = self.report_period.next();
    }
}
