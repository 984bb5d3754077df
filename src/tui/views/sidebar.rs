//! Sidebar view
//!
//! Shows the screen menu and ledger totals for the current month

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{DateRange, Money, TransactionType};
use crate::tui::app::{ActiveView, App, FocusedPanel};
use crate::tui::layout::SidebarLayout;

/// Render the sidebar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = SidebarLayout::new(area);

    render_header(frame, layout.header);
    render_menu(frame, app, layout.menu);
    render_summary(frame, app, layout.summary);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Tally ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let version = Paragraph::new(concat!("v", env!("CARGO_PKG_VERSION")))
        .block(block)
        .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(version, area);
}

fn render_menu(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focused_panel == FocusedPanel::Sidebar {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Screens ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let items: Vec<ListItem> = ActiveView::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let active = app.active_view == *view;
            let style = if active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let indicator = if active { "▶" } else { " " };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", indicator), style),
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(view.title(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let month = DateRange::month_containing(app.today());
    let sum = |kind| {
        app.storage
            .transactions
            .get_by_date_range(&month)
            .unwrap_or_default()
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum::<Money>()
    };
    let income = sum(TransactionType::Income);
    let expenses = sum(TransactionType::Expense);
    let net = income - expenses;

    let block = Block::default()
        .title(format!(" {} ", app.today().format("%B %Y")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let row = |label: &str, amount: Money, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::White)),
            Span::styled(
                format!("{:>12}", app.settings.format_money(amount)),
                Style::default().fg(color),
            ),
        ])
    };
    let net_color = if net.is_negative() { Color::Red } else { Color::Green };

    let lines = vec![
        row("Income", income, Color::Green),
        row("Expenses", expenses, Color::Red),
        row("Net", net, net_color),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
