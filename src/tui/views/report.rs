//! Income and expense report views
//!
//! A horizontal bar chart per category above the breakdown table. Both use
//! the palette built for the report being drawn.

use ratatui::{
    layout::{Constraint, Direction, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::display::report::{format_percentage, truncate};
use crate::display::CategoryPalette;
use crate::models::TransactionType;
use crate::reports::CategoryReport;
use crate::tui::app::{App, FocusedPanel};
use crate::tui::layout::ReportLayout;

/// Report shown by the active report view
pub fn current_report(app: &App, kind: TransactionType) -> Option<CategoryReport> {
    CategoryReport::generate(app.storage, kind, app.report_period, app.today()).ok()
}

/// Terminal color for a category, falling back to white
pub fn category_color(palette: &CategoryPalette, category: &str) -> Color {
    palette
        .color_of(category)
        .map(Color::Indexed)
        .unwrap_or(Color::White)
}

/// Render a report view
pub fn render(frame: &mut Frame, app: &mut App, area: Rect, kind: TransactionType) {
    let layout = ReportLayout::new(area);

    let Some(report) = current_report(app, kind) else {
        let text = Paragraph::new("Could not load transactions")
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(text, area);
        return;
    };
    let palette = CategoryPalette::for_report(&report);

    render_header(frame, app, &report, layout.header);

    if report.is_empty() {
        let text = Paragraph::new(format!(
            "No {} transactions found for this period.",
            report.kind
        ))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).border_style(border(app)));
        let content = Rect {
            height: layout.chart.height + layout.breakdown.height,
            ..layout.chart
        };
        frame.render_widget(text, content);
        return;
    }

    render_chart(frame, app, &report, &palette, layout.chart);
    render_breakdown(frame, app, &report, &palette, layout.breakdown);
}

fn border(app: &App) -> Style {
    if app.focused_panel == FocusedPanel::Main {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_header(frame: &mut Frame, app: &App, report: &CategoryReport, area: Rect) {
    let total_color = match report.kind {
        TransactionType::Income => Color::Green,
        TransactionType::Expense => Color::Red,
    };

    let block = Block::default()
        .title(format!(" {} Report - {} ", report.kind.title(), report.label))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = Line::from(vec![
        Span::styled(
            format!("Total {}: ", report.kind.title()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            app.settings.format_money(report.total),
            Style::default().fg(total_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Period: ", Style::default().fg(Color::DarkGray)),
        Span::styled(report.period.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled("   p:Change period", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_chart(
    frame: &mut Frame,
    app: &App,
    report: &CategoryReport,
    palette: &CategoryPalette,
    area: Rect,
) {
    let bars: Vec<Bar> = report
        .entries
        .iter()
        .map(|entry| {
            let color = category_color(palette, &entry.category);
            Bar::default()
                .value(entry.amount.cents().max(0) as u64)
                .label(Line::from(truncate(&entry.category, 14)))
                .text_value(app.settings.format_money(entry.amount))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Category Breakdown Chart ")
                .borders(Borders::ALL)
                .border_style(border(app)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_breakdown(
    frame: &mut Frame,
    app: &App,
    report: &CategoryReport,
    palette: &CategoryPalette,
    area: Rect,
) {
    let widths = [
        Constraint::Length(2),  // Color marker
        Constraint::Length(20), // Category
        Constraint::Length(14), // Amount
        Constraint::Length(8),  // Percent
        Constraint::Min(6),     // Count
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Category").style(bold),
        Cell::from("Amount").style(bold),
        Cell::from("Share").style(bold),
        Cell::from("Count").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = report
        .entries
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from("█").style(
                    Style::default().fg(category_color(palette, &entry.category)),
                ),
                Cell::from(truncate(&entry.category, 20)),
                Cell::from(app.settings.format_money(entry.amount)),
                Cell::from(format_percentage(entry.percentage)),
                Cell::from(entry.transaction_count.to_string()),
            ])
        })
        .collect();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Breakdown by Category ")
            .borders(Borders::ALL)
            .border_style(border(app)),
    );

    frame.render_widget(table, area);
}
