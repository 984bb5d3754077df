//! Transactions view
//!
//! The whole ledger as a table, with a type filter, a text search and a
//! selectable sort column.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{Money, Transaction, TransactionType};
use crate::services::{TransactionFilter, TransactionService};
use crate::tui::app::{App, FocusedPanel};
use crate::tui::layout::MainPanelLayout;
use crate::tui::widgets::TextInput;

/// Column the table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Category,
    Description,
}

impl SortField {
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Description,
            Self::Description => Self::Date,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Description => "Description",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Date => a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
            Self::Description => a
                .description
                .to_lowercase()
                .cmp(&b.description.to_lowercase()),
        }
    }
}

/// Table state for the transactions view
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// `None` shows both types
    pub kind: Option<TransactionType>,
    pub sort: SortField,
    pub descending: bool,
    /// Case-insensitive match on description or category
    pub search: TextInput,
    /// Keys go to the search field
    pub searching: bool,
    pub selected: usize,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            kind: None,
            sort: SortField::default(),
            descending: true,
            search: TextInput::new().label("Search"),
            searching: false,
            selected: 0,
        }
    }
}

impl LedgerState {
    /// Cycle the type filter: all, income, expense
    pub fn cycle_kind(&mut self) {
        self.kind = match self.kind {
            None => Some(TransactionType::Income),
            Some(TransactionType::Income) => Some(TransactionType::Expense),
            Some(TransactionType::Expense) => None,
        };
        self.selected = 0;
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            None => "all",
            Some(TransactionType::Income) => "income",
            Some(TransactionType::Expense) => "expense",
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.selected = 0;
    }

    pub fn toggle_direction(&mut self) {
        self.descending = !self.descending;
        self.selected = 0;
    }

    pub fn start_search(&mut self) {
        self.searching = true;
        self.search.focused = true;
    }

    pub fn finish_search(&mut self) {
        self.searching = false;
        self.search.focused = false;
        self.selected = 0;
    }

    /// Reset type filter and search
    pub fn clear_filters(&mut self) {
        self.kind = None;
        self.search.clear();
        self.finish_search();
    }

    /// Apply search and sort to an already type-filtered ledger
    pub fn apply(&self, mut transactions: Vec<Transaction>) -> Vec<Transaction> {
        let needle = self.search.value().trim().to_lowercase();
        if !needle.is_empty() {
            transactions.retain(|t| {
                t.description.to_lowercase().contains(&needle)
                    || t.category.to_lowercase().contains(&needle)
            });
        }

        transactions.sort_by(|a, b| {
            let ordering = self.sort.compare(a, b);
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        transactions
    }
}

/// Rows currently shown, in display order
pub fn visible_transactions(app: &App) -> Vec<Transaction> {
    let mut filter = TransactionFilter::new();
    if let Some(kind) = app.ledger.kind {
        filter = filter.kind(kind);
    }

    let page = TransactionService::reader(app.storage)
        .list(filter)
        .map(|page| page.transactions)
        .unwrap_or_default();
    app.ledger.apply(page)
}

/// Income minus expenses
pub fn net_total(transactions: &[Transaction]) -> Money {
    transactions.iter().fold(Money::zero(), |acc, t| match t.kind {
        TransactionType::Income => acc + t.amount,
        TransactionType::Expense => acc - t.amount,
    })
}

/// Render the transactions view
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = MainPanelLayout::new(area);
    let transactions = visible_transactions(app);

    if app.ledger.selected >= transactions.len() {
        app.ledger.selected = transactions.len().saturating_sub(1);
    }

    render_header(frame, app, &transactions, layout.header);
    render_table(frame, app, &transactions, layout.content);
}

fn render_header(frame: &mut Frame, app: &App, transactions: &[Transaction], area: Rect) {
    let net = net_total(transactions);
    let block = Block::default()
        .title(format!(
            " Transactions ({}) - Net {} ",
            transactions.len(),
            app.settings.format_money(net)
        ))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = if app.ledger.searching {
        app.ledger.search.line(6)
    } else {
        let arrow = if app.ledger.descending { "↓" } else { "↑" };
        let mut spans = vec![
            Span::styled("Filter: ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.ledger.kind_label(), Style::default().fg(Color::Yellow)),
            Span::styled("  Sort: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} {}", app.ledger.sort.title(), arrow),
                Style::default().fg(Color::Yellow),
            ),
        ];
        if !app.ledger.search.value().is_empty() {
            spans.push(Span::styled("  Search: ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                format!("\"{}\"", app.ledger.search.value()),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            "   a:Add d:Delete f:Type o:Sort /:Search",
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, transactions: &[Transaction], area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::Main;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if transactions.is_empty() {
        let text = Paragraph::new("No transactions found. Press 'a' to add one.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(12), // Date
        Constraint::Length(8),  // Type
        Constraint::Length(12), // Amount
        Constraint::Length(18), // Category
        Constraint::Min(10),    // Description
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("Date").style(bold),
        Cell::from("Type").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from("Category").style(bold),
        Cell::from("Description").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = transactions
        .iter()
        .map(|txn| {
            let (sign, color) = match txn.kind {
                TransactionType::Income => ("+", Color::Green),
                TransactionType::Expense => ("-", Color::Red),
            };
            let category_style = if txn.is_uncategorized() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(app.settings.format_date(txn.date)),
                Cell::from(txn.kind.title()),
                Cell::from(format!("{}{}", sign, app.settings.format_money(txn.amount)))
                    .style(Style::default().fg(color)),
                Cell::from(txn.category.clone()).style(category_style),
                Cell::from(txn.description.clone()),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if is_focused {
        state.select(Some(app.ledger.selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(day: u32, desc: &str, cents: i64, category: &str, kind: TransactionType) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
            desc,
            Money::from_cents(cents),
            category,
            kind,
        )
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            txn(3, "Whole Foods", 7550, "Groceries", TransactionType::Expense),
            txn(1, "Salary", 300000, "Salary", TransactionType::Income),
            txn(2, "Starbucks", 450, "Restaurants", TransactionType::Expense),
        ]
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let state = LedgerState::default();
        let rows = state.apply(ledger());
        let days: Vec<_> = rows.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(days, ["Whole Foods", "Starbucks", "Salary"]);
    }

    #[test]
    fn test_sort_by_amount_ascending() {
        let mut state = LedgerState::default();
        state.cycle_sort();
        state.toggle_direction();
        assert_eq!(state.sort, SortField::Amount);

        let rows = state.apply(ledger());
        assert_eq!(rows[0].description, "Starbucks");
        assert_eq!(rows[2].description, "Salary");
    }

    #[test]
    fn test_search_matches_description_or_category() {
        let mut state = LedgerState::default();
        for c in "grocer".chars() {
            state.search.insert(c);
        }
        let rows = state.apply(ledger());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Whole Foods");

        state.clear_filters();
        assert_eq!(state.apply(ledger()).len(), 3);
    }

    #[test]
    fn test_kind_cycle() {
        let mut state = LedgerState::default();
        assert_eq!(state.kind_label(), "all");
        state.cycle_kind();
        assert_eq!(state.kind, Some(TransactionType::Income));
        state.cycle_kind();
        assert_eq!(state.kind_label(), "expense");
        state.cycle_kind();
        assert_eq!(state.kind, None);
    }

    #[test]
    fn test_net_total() {
        assert_eq!(net_total(&ledger()), Money::from_cents(300000 - 7550 - 450));
    }
}
