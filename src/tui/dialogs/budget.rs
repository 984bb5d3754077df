//! Set Budget dialog
//!
//! Category, amount and an inclusive date range. The range defaults to the
//! current month; saving over an existing category and range updates it.

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
use crate::models::{DateRange, Money};
use crate::services::{BudgetService, SetBudgetOutcome};
use crate::tui::app::{App, StatusLevel};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::TextInput;

const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BudgetField {
    #[default]
    Category,
    Amount,
    Start,
    End,
}

impl BudgetField {
    pub fn next(self) -> Self {
        match self {
            Self::Category => Self::Amount,
            Self::Amount => Self::Start,
            Self::Start => Self::End,
            Self::End => Self::Category,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Category => Self::End,
            Self::Amount => Self::Category,
            Self::Start => Self::Amount,
            Self::End => Self::Start,
        }
    }
}

/// A validated budget ready for [`BudgetService::set`]
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: Money,
    pub range: DateRange,
}

/// State for the Set Budget dialog
#[derive(Debug, Clone)]
pub struct BudgetFormState {
    pub focused_field: BudgetField,
    pub category_input: TextInput,
    pub amount_input: TextInput,
    pub start_input: TextInput,
    pub end_input: TextInput,
    pub error_message: Option<String>,
}

impl Default for BudgetFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetFormState {
    pub fn new() -> Self {
        let mut state = Self {
            focused_field: BudgetField::Category,
            category_input: TextInput::new().label("Category").placeholder("e.g. Groceries"),
            amount_input: TextInput::new().label("Amount").placeholder("e.g. 500"),
            start_input: TextInput::new().label("Start").placeholder("DD/MM/YYYY"),
            end_input: TextInput::new().label("End").placeholder("DD/MM/YYYY"),
            error_message: None,
        };
        state.update_focus();
        state
    }

    /// Prefill the range with the month containing `today`
    pub fn for_month(today: NaiveDate, settings: &Settings) -> Self {
        let month = DateRange::month_containing(today);
        let mut state = Self::new();
        state.start_input = state.start_input.content(settings.format_date(month.start));
        state.end_input = state.end_input.content(settings.format_date(month.end));
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
        self.category_input.focused = self.focused_field == BudgetField::Category;
        self.amount_input.focused = self.focused_field == BudgetField::Amount;
        self.start_input.focused = self.focused_field == BudgetField::Start;
        self.end_input.focused = self.focused_field == BudgetField::End;
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            BudgetField::Category => &mut self.category_input,
            BudgetField::Amount => &mut self.amount_input,
            BudgetField::Start => &mut self.start_input,
            BudgetField::End => &mut self.end_input,
        }
    }

    /// Validate the form
    pub fn build(&self, settings: &Settings) -> Result<BudgetDraft, String> {
        let category = self.category_input.value().trim();
        if category.is_empty() {
            return Err("Category cannot be empty".to_string());
        }

        let amount = Money::parse(self.amount_input.value())
            .map_err(|_| "Invalid amount. Use a format like 500 or 500.00".to_string())?;
        if !amount.is_positive() {
            return Err("Budget amount must be greater than zero".to_string());
        }

        let parse = |input: &TextInput, which: &str| {
            settings
                .parse_date(input.value().trim())
                .map_err(|_| format!("Invalid {} date (use DD/MM/YYYY)", which))
        };
        let start = parse(&self.start_input, "start")?;
        let end = parse(&self.end_input, "end")?;
        let range = DateRange::new(start, end).map_err(|e| e.to_string())?;

        Ok(BudgetDraft {
            category: category.to_string(),
            amount,
            range,
        })
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Status bar text after a budget is saved
pub fn outcome_message(outcome: &SetBudgetOutcome, settings: &Settings) -> String {
    match outcome {
        SetBudgetOutcome::Created(budget) => match budget.period {
            Some(range) => format!(
                "Budget set for {}: {} ({})",
                budget.category,
                settings.format_money(budget.amount),
                range.format(&settings.date_format)
            ),
            None => format!(
                "Budget set for {}: {}",
                budget.category,
                settings.format_money(budget.amount)
            ),
        },
        SetBudgetOutcome::Updated { before, after } => format!(
            "Budget updated for {}: {} -> {}",
            after.category,
            settings.format_money(before.amount),
            settings.format_money(after.amount)
        ),
    }
}

/// Render the budget dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(56, 12, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Set Budget ")
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
            Constraint::Length(1), // Category
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Start
            Constraint::Length(1), // End
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.budget_form;
    frame.render_widget(Paragraph::new(form.category_input.line(LABEL_WIDTH)), chunks[0]);
    frame.render_widget(Paragraph::new(form.amount_input.line(LABEL_WIDTH)), chunks[1]);
    frame.render_widget(Paragraph::new(form.start_input.line(LABEL_WIDTH)), chunks[2]);
    frame.render_widget(Paragraph::new(form.end_input.line(LABEL_WIDTH)), chunks[3]);

    if let Some(ref error) = form.error_message {
        let line = Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)));
        frame.render_widget(Paragraph::new(line), chunks[5]);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[7]);
}

/// Handle key input for the budget dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let form = &mut app.budget_form;

    match key.code {
        KeyCode::Esc => app.close_dialog(),

        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => form.prev_field(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),

        KeyCode::Enter => save_budget(app),

        KeyCode::Backspace => {
            form.clear_error();
            form.focused_input().backspace();
        }
        KeyCode::Delete => {
            form.clear_error();
            form.focused_input().delete();
        }
        KeyCode::Left => form.focused_input().move_left(),
        KeyCode::Right => form.focused_input().move_right(),
        KeyCode::Home => form.focused_input().move_start(),
        KeyCode::End => form.focused_input().move_end(),
        KeyCode::Char(c) => {
            form.clear_error();
            form.focused_input().insert(c);
        }

        _ => {}
    }
}

fn save_budget(app: &mut App) {
    let draft = match app.budget_form.build(app.settings) {
        Ok(draft) => draft,
        Err(e) => {
            app.budget_form.set_error(e);
            return;
        }
    };

    let result = BudgetService::new(app.storage)
        .with_warning_percent(app.settings.budget_warning_percent)
        .set(&draft.category, draft.amount, draft.range);

    match result {
        Ok(outcome) => {
            let message = outcome_message(&outcome, app.settings);
            app.close_dialog();
            app.set_status_level(StatusLevel::Success, message);
        }
        Err(e) => app.budget_form.set_error(e.to_string()),
    }
}
