//! Add Transaction dialog
//!
//! Modal form with type, description, amount, date and category fields. An
//! empty date means today and an empty category is filled in by the rules.
//! After saving, the status bar reports how the transaction affects its
//! category's budget.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::Settings;
use crate::display::budget_feedback;
use crate::models::{Money, TransactionType};
use crate::services::{
    AddOutcome, BudgetImpact, BudgetStatus, NewTransaction, RuleEngine, TransactionService,
};
use crate::tui::app::{App, StatusLevel};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

const LABEL_WIDTH: usize = 12;

/// Which field is currently focused in the transaction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionField {
    #[default]
    Type,
    Description,
    Amount,
    Date,
    Category,
}

impl TransactionField {
    /// Get the next field (for Tab navigation)
    pub fn next(self) -> Self {
        match self {
            Self::Type => Self::Description,
            Self::Description => Self::Amount,
            Self::Amount => Self::Date,
            Self::Date => Self::Category,
            Self::Category => Self::Type,
        }
    }

    /// Get the previous field (for Shift+Tab navigation)
    pub fn prev(self) -> Self {
        match self {
            Self::Type => Self::Category,
            Self::Description => Self::Type,
            Self::Amount => Self::Description,
            Self::Date => Self::Amount,
            Self::Category => Self::Date,
        }
    }
}

/// State for the Add Transaction dialog
#[derive(Debug, Clone)]
pub struct TransactionFormState {
    pub focused_field: TransactionField,
    pub kind: TransactionType,
    pub description_input: TextInput,
    pub amount_input: TextInput,
    pub date_input: TextInput,
    pub category_input: TextInput,
    pub error_message: Option<String>,
}

impl Default for TransactionFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionFormState {
    pub fn new() -> Self {
        let mut state = Self {
            focused_field: TransactionField::Type,
            kind: TransactionType::Expense,
            description_input: TextInput::new()
                .label("Description")
                .placeholder("e.g. Whole Foods Market"),
            amount_input: TextInput::new().label("Amount").placeholder("e.g. 75.50"),
            date_input: TextInput::new()
                .label("Date")
                .placeholder("DD/MM/YYYY, empty for today"),
            category_input: TextInput::new()
                .label("Category")
                .placeholder("empty to auto-categorize"),
            error_message: None,
        };
        state.update_focus();
        state
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.update_focus();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.update_focus();
    }

    fn update_focus(&mut self) {
        self.description_input.focused = self.focused_field == TransactionField::Description;
        self.amount_input.focused = self.focused_field == TransactionField::Amount;
        self.date_input.focused = self.focused_field == TransactionField::Date;
        self.category_input.focused = self.focused_field == TransactionField::Category;
    }

    /// The focused text input; `None` while the type selector has focus
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused_field {
            TransactionField::Type => None,
            TransactionField::Description => Some(&mut self.description_input),
            TransactionField::Amount => Some(&mut self.amount_input),
            TransactionField::Date => Some(&mut self.date_input),
            TransactionField::Category => Some(&mut self.category_input),
        }
    }

    pub fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        };
    }

    /// Category the rules would pick, shown while the category field is empty
    pub fn suggestion(&self, engine: &RuleEngine) -> Option<String> {
        let description = self.description_input.value().trim();
        if description.is_empty() || !self.category_input.value().trim().is_empty() {
            return None;
        }
        Some(engine.categorize(description))
    }

    /// Validate the form into a transaction ready to add
    pub fn build(&self, settings: &Settings, today: NaiveDate) -> Result<NewTransaction, String> {
        let description = self.description_input.value().trim();
        if description.is_empty() {
            return Err("Description cannot be empty".to_string());
        }

        let amount = Money::parse(self.amount_input.value())
            .map_err(|_| "Invalid amount. Use a format like 75.50".to_string())?;
        if !amount.is_positive() {
            return Err("Amount must be greater than zero".to_string());
        }

        let date = match self.date_input.value().trim() {
            "" => today,
            text => settings
                .parse_date(text)
                .map_err(|_| "Invalid date format (use DD/MM/YYYY)".to_string())?,
        };

        let category = Some(self.category_input.value().trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(NewTransaction {
            date,
            description: description.to_string(),
            amount,
            category,
            kind: self.kind,
        })
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Status bar severity for the feedback after an add
pub fn feedback_level(impact: Option<&BudgetImpact>) -> StatusLevel {
    match impact {
        Some(BudgetImpact::Checked(check)) => match check.status {
            BudgetStatus::OverBudget => StatusLevel::Error,
            BudgetStatus::Warning => StatusLevel::Warning,
            _ => StatusLevel::Success,
        },
        _ => StatusLevel::Success,
    }
}

/// Status bar text after an add
pub fn feedback_message(outcome: &AddOutcome, settings: &Settings) -> String {
    let txn = &outcome.transaction;
    let mut message = format!("Added '{}'", txn.description);
    if outcome.auto_categorized {
        message.push_str(&format!(" (auto-categorized as {})", txn.category));
    }
    message.push_str(". ");
    message.push_str(&budget_feedback(
        &txn.category,
        outcome.budget.as_ref(),
        settings,
    ));
    message
}

/// Render the transaction dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(64, 14, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Add Transaction ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Type
            Constraint::Length(1), // Description
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Date
            Constraint::Length(1), // Category
            Constraint::Length(1), // Suggestion
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.transaction_form;

    frame.render_widget(Paragraph::new(type_line(form)), chunks[0]);
    frame.render_widget(Paragraph::new(form.description_input.line(LABEL_WIDTH)), chunks[1]);
    frame.render_widget(Paragraph::new(form.amount_input.line(LABEL_WIDTH)), chunks[2]);
    frame.render_widget(Paragraph::new(form.date_input.line(LABEL_WIDTH)), chunks[3]);
    frame.render_widget(Paragraph::new(form.category_input.line(LABEL_WIDTH)), chunks[4]);

    if let Some(suggested) = form.suggestion(&app.engine) {
        let line = Line::from(vec![
            Span::raw(" ".repeat(LABEL_WIDTH + 2)),
            Span::styled(
                format!("Suggested: {}", suggested),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[5]);
    }

    if let Some(ref error) = form.error_message {
        let line = Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)));
        frame.render_widget(Paragraph::new(line), chunks[7]);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[Space]", Style::default().fg(Color::Yellow)),
        Span::raw(" Type  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[9]);
}

fn type_line(form: &TransactionFormState) -> Line<'static> {
    let focused = form.focused_field == TransactionField::Type;
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let option = |kind: TransactionType| {
        let selected = form.kind == kind;
        let text = if selected {
            format!("[{}]", kind.title())
        } else {
            format!(" {} ", kind.title())
        };
        let style = match (selected, focused) {
            (true, true) => Style::default().fg(Color::Black).bg(Color::Cyan),
            (true, false) => Style::default().fg(Color::Yellow),
            (false, _) => Style::default().fg(Color::DarkGray),
        };
        Span::styled(text, style)
    };

    Line::from(vec![
        Span::styled(format!("{:>width$}: ", "Type", width = LABEL_WIDTH), label_style),
        option(TransactionType::Expense),
        Span::raw(" "),
        option(TransactionType::Income),
    ])
}

/// Handle key input for the transaction dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let form = &mut app.transaction_form;

    match key.code {
        KeyCode::Esc => app.close_dialog(),

        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => form.prev_field(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),

        KeyCode::Enter => save_transaction(app),

        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if form.focused_field == TransactionField::Type =>
        {
            form.toggle_kind();
        }
        KeyCode::Char('i') | KeyCode::Char('I') if form.focused_field == TransactionField::Type => {
            form.kind = TransactionType::Income;
        }
        KeyCode::Char('e') | KeyCode::Char('E') if form.focused_field == TransactionField::Type => {
            form.kind = TransactionType::Expense;
        }

        KeyCode::Backspace => {
            form.clear_error();
            if let Some(input) = form.focused_input() {
                input.backspace();
            }
        }
        KeyCode::Delete => {
            form.clear_error();
            if let Some(input) = form.focused_input() {
                input.delete();
            }
        }
        KeyCode::Left => {
            if let Some(input) = form.focused_input() {
                input.move_left();
            }
        }
        KeyCode::Right => {
            if let Some(input) = form.focused_input() {
                input.move_right();
            }
        }
        KeyCode::Home => {
            if let Some(input) = form.focused_input() {
                input.move_start();
            }
        }
        KeyCode::End => {
            if let Some(input) = form.focused_input() {
                input.move_end();
            }
        }
        KeyCode::Char(c) => {
            form.clear_error();
            if let Some(input) = form.focused_input() {
                input.insert(c);
            }
        }

        _ => {}
    }
}

/// Validate, store and report on the new transaction
fn save_transaction(app: &mut App) {
    let input = match app.transaction_form.build(app.settings, app.today()) {
        Ok(input) => input,
        Err(e) => {
            app.transaction_form.set_error(e);
            return;
        }
    };

    let result = TransactionService::new(app.storage, &app.engine)
        .with_warning_percent(app.settings.budget_warning_percent)
        .add(input);

    match result {
        Ok(outcome) => {
            let level = feedback_level(outcome.budget.as_ref());
            let message = feedback_message(&outcome, app.settings);
            app.close_dialog();
            app.set_status_level(level, message);
        }
        Err(e) => app.transaction_form.set_error(e.to_string()),
    }
}
