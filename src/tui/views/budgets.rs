//! Budgets view
//!
//! Every budget with spent against target, percent used and a status color.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::report::truncate;
use crate::models::{Budget, Money};
use crate::services::{BudgetCheck, BudgetService, BudgetStatus};
use crate::tui::app::{App, FocusedPanel};
use crate::tui::layout::MainPanelLayout;

/// Color used for a budget status
pub fn status_color(status: BudgetStatus) -> Color {
    match status {
        BudgetStatus::Ok | BudgetStatus::TargetMet => Color::Green,
        BudgetStatus::Warning | BudgetStatus::InProgress => Color::Yellow,
        BudgetStatus::OverBudget => Color::Red,
    }
}

/// Budgets with their current expense check, in list order
pub fn budget_rows(app: &App) -> Vec<(Budget, BudgetCheck)> {
    BudgetService::new(app.storage)
        .with_warning_percent(app.settings.budget_warning_percent)
        .overview(app.today())
        .unwrap_or_default()
}

/// Render the budgets view
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = MainPanelLayout::new(area);
    let rows = budget_rows(app);

    if app.selected_budget_index >= rows.len() {
        app.selected_budget_index = rows.len().saturating_sub(1);
    }

    render_header(frame, app, &rows, layout.header);
    render_table(frame, app, &rows, layout.content);
}

fn render_header(frame: &mut Frame, app: &App, rows: &[(Budget, BudgetCheck)], area: Rect) {
    let block = Block::default()
        .title(" Budgets ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let over = rows
        .iter()
        .filter(|(_, check)| check.status == BudgetStatus::OverBudget)
        .count();
    let warning = rows
        .iter()
        .filter(|(_, check)| check.status == BudgetStatus::Warning)
        .count();
    let budgeted: Money = rows.iter().map(|(budget, _)| budget.amount).sum();

    let line = Line::from(vec![
        Span::styled("Total budgeted: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.settings.format_money(budgeted),
            Style::default().fg(Color::White),
        ),
        Span::styled("  Over: ", Style::default().fg(Color::DarkGray)),
        Span::styled(over.to_string(), Style::default().fg(status_color(BudgetStatus::OverBudget))),
        Span::styled("  Warning: ", Style::default().fg(Color::DarkGray)),
        Span::styled(warning.to_string(), Style::default().fg(status_color(BudgetStatus::Warning))),
        Span::styled("   n:Set budget d:Delete", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, rows: &[(Budget, BudgetCheck)], area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::Main;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if rows.is_empty() {
        let text = Paragraph::new("No budgets set yet. Press 'n' to set one.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(18), // Category
        Constraint::Length(25), // Period
        Constraint::Length(12), // Budget
        Constraint::Length(12), // Spent
        Constraint::Length(12), // Remaining
        Constraint::Length(6),  // Percent
        Constraint::Min(8),     // Status
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(
        ["Category", "Period", "Budget", "Spent", "Remaining", "%", "Status"]
            .into_iter()
            .map(|title| Cell::from(title).style(bold)),
    )
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|(budget, check)| {
            let color = status_color(check.status);
            let remaining_color = if check.remaining.is_negative() {
                Color::Red
            } else {
                Color::Green
            };
            let percent = check
                .percent
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| "n/a".to_string());

            Row::new(vec![
                Cell::from(truncate(&budget.category, 18)),
                Cell::from(check.range.format(&app.settings.date_format)),
                Cell::from(app.settings.format_money(check.target)),
                Cell::from(app.settings.format_money(check.used)),
                Cell::from(app.settings.format_money(check.remaining))
                    .style(Style::default().fg(remaining_color)),
                Cell::from(percent).style(Style::default().fg(color)),
                Cell::from(check.status.label()).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let table = Table::new(table_rows, widths)
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
        state.select(Some(app.selected_budget_index));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(BudgetStatus::Ok), Color::Green);
        assert_eq!(status_color(BudgetStatus::Warning), Color::Yellow);
        assert_eq!(status_color(BudgetStatus::OverBudget), Color::Red);
        assert_eq!(status_color(BudgetStatus::TargetMet), Color::Green);
    }
}
