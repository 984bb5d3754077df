//! Help dialog
//!
//! Shows the global keys plus the keys of the current screen

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{ActiveView, App};
use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(app.active_view))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Help text for a screen
fn help_lines(view: ActiveView) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Global Keys"),
        key_line("q", "Quit"),
        key_line("?", "Show/hide help"),
        key_line("1-5", "Jump to a screen"),
        key_line("Tab", "Switch panel focus"),
        key_line("h/l", "Focus sidebar/main panel"),
        key_line("j/k", "Move selection down/up"),
        Line::from(""),
        heading(view.title()),
    ];

    let keys: &[(&'static str, &'static str)] = match view {
        ActiveView::Transactions => &[
            ("a", "Add a transaction"),
            ("d", "Delete the selected transaction"),
            ("f", "Filter by type"),
            ("o / O", "Cycle sort field / reverse order"),
            ("/", "Search descriptions and categories"),
            ("x", "Clear filters and search"),
            ("g / G", "Jump to first/last"),
        ],
        ActiveView::Budgets => &[
            ("n", "Set a budget (same category and range updates it)"),
            ("d", "Delete the selected budget"),
        ],
        ActiveView::IncomeReport | ActiveView::ExpenseReport => &[
            ("p", "Cycle period: this month, this year, all time"),
            ("a", "Add a transaction"),
        ],
        ActiveView::Rules => &[
            ("t", "Test a description against the rules"),
            ("Esc", "Leave the tester"),
        ],
    };
    lines.extend(keys.iter().map(|&(key, desc)| key_line(key, desc)));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    ))
}

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>8}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(description, Style::default().fg(Color::White)),
    ])
}
