//! Status bar view
//!
//! Shows the latest status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{App, InputMode};

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.active_view.title()),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(status) = &app.status {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            status.text.clone(),
            Style::default().fg(status.level.color()),
        ));
    }

    let hints = match app.input_mode {
        InputMode::Editing => " Enter:Confirm  Esc:Cancel ",
        InputMode::Normal => " q:Quit  ?:Help  Tab:Focus ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize)
        .saturating_sub(left_len)
        .saturating_sub(hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
