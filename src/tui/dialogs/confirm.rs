//! Confirmation dialog for deletions

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::ConfirmAction;
use crate::tui::layout::centered_rect_fixed;

/// Render the confirmation for a pending action
pub fn render(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect_fixed(54, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Confirm Delete ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(action.message(), Style::default().fg(Color::White))),
        Line::from(Span::styled(
            "This is recorded in the audit log and cannot be undone.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y/Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Delete  "),
            Span::styled("[n/Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Keep"),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
