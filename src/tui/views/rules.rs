//! Category rules view
//!
//! Rules in the order they are tried, plus a tester line that shows which
//! rule a typed description would hit.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::report::truncate;
use crate::models::UNCATEGORIZED;
use crate::services::RuleEngine;
use crate::tui::app::{App, FocusedPanel};
use crate::tui::widgets::TextInput;

/// Selection and tester input for the rules view
#[derive(Debug, Clone)]
pub struct RulesViewState {
    pub selected: usize,
    pub tester: TextInput,
    /// Keys go to the tester
    pub testing: bool,
}

impl Default for RulesViewState {
    fn default() -> Self {
        Self {
            selected: 0,
            tester: TextInput::new()
                .label("Test")
                .placeholder("press t and type a description"),
            testing: false,
        }
    }
}

impl RulesViewState {
    pub fn start_testing(&mut self) {
        self.testing = true;
        self.tester.focused = true;
    }

    pub fn stop_testing(&mut self) {
        self.testing = false;
        self.tester.focused = false;
    }

    /// Result line for the tester, `None` when nothing has been typed
    pub fn verdict(&self, engine: &RuleEngine) -> Option<(String, bool)> {
        let description = self.tester.value().trim();
        if description.is_empty() {
            return None;
        }

        Some(match engine.find_match(description) {
            Some(rule) => (
                format!("-> {} (rule: {})", rule.category, truncate(&rule.description, 30)),
                true,
            ),
            None => (format!("-> {} (no rule matches)", UNCATEGORIZED), false),
        })
    }
}

/// Render the rules view
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Tester
            Constraint::Min(3),    // Rules
        ])
        .split(area);

    let rule_count = app.engine.len();
    if app.rules_view.selected >= rule_count {
        app.rules_view.selected = rule_count.saturating_sub(1);
    }

    render_tester(frame, app, chunks[0]);
    render_rules(frame, app, chunks[1]);
}

fn render_tester(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Category Rules ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let verdict = match app.rules_view.verdict(&app.engine) {
        Some((text, true)) => Line::from(Span::styled(text, Style::default().fg(Color::Green))),
        Some((text, false)) => Line::from(Span::styled(text, Style::default().fg(Color::Yellow))),
        None => Line::from(Span::styled(
            "Patterns are case-insensitive; the highest priority match wins.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let lines = vec![app.rules_view.tester.line(4), verdict];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_rules(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::Main && !app.rules_view.testing;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let rules = app.engine.rules();
    if rules.is_empty() {
        let text = Paragraph::new("No categorization rules.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(4),  // Order
        Constraint::Length(16), // Category
        Constraint::Length(8),  // Priority
        Constraint::Length(26), // Description
        Constraint::Min(10),    // Pattern
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(
        ["#", "Category", "Priority", "Description", "Pattern"]
            .into_iter()
            .map(|title| Cell::from(title).style(bold)),
    )
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(truncate(&rule.category, 16)).style(Style::default().fg(Color::Cyan)),
                Cell::from(rule.priority.to_string()),
                Cell::from(truncate(&rule.description, 26)),
                Cell::from(rule.pattern.clone()).style(Style::default().fg(Color::DarkGray)),
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
        state.select(Some(app.rules_view.selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_names_the_matching_category() {
        let engine = RuleEngine::with_default_rules();
        let mut state = RulesViewState::default();
        assert_eq!(state.verdict(&engine), None);

        for c in "Starbucks Coffee".chars() {
            state.tester.insert(c);
        }
        let (text, matched) = state.verdict(&engine).unwrap();
        assert!(matched);
        assert!(text.starts_with("-> Restaurants"));
    }

    #[test]
    fn test_verdict_for_unmatched_text() {
        let engine = RuleEngine::with_default_rules();
        let mut state = RulesViewState::default();
        for c in "random unmatched text".chars() {
            state.tester.insert(c);
        }
        let (text, matched) = state.verdict(&engine).unwrap();
        assert!(!matched);
        assert!(text.contains("Uncategorized"));
    }
}
