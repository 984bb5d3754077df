//! Text input field
//!
//! Single-line editable text with a character cursor. Dialogs own one
//! `TextInput` per form field and render it with [`TextInput::line`].

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// A single-line text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    content: String,
    /// Cursor position in characters, not bytes
    cursor: usize,
    pub focused: bool,
    pub placeholder: String,
    pub label: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the content and move the cursor to its end
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.cursor = self.char_len();
        self
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn value(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Render as `label: value`, with the label right-aligned to `label_width`
    ///
    /// An unfocused empty field shows its placeholder. A focused field shows
    /// the cursor as an inverted cell.
    pub fn line(&self, label_width: usize) -> Line<'static> {
        let label_style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let mut spans = vec![Span::styled(
            format!("{:>width$}: ", self.label, width = label_width),
            label_style,
        )];

        if !self.focused {
            if self.content.is_empty() {
                spans.push(Span::styled(
                    self.placeholder.clone(),
                    Style::default().fg(Color::DarkGray),
                ));
            } else {
                spans.push(Span::styled(
                    self.content.clone(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            return Line::from(spans);
        }

        let value_style = Style::default().fg(Color::White);
        let before: String = self.content.chars().take(self.cursor).collect();
        let mut rest = self.content.chars().skip(self.cursor);
        let under = rest.next().unwrap_or(' ');
        let after: String = rest.collect();

        spans.push(Span::styled(before, value_style));
        spans.push(Span::styled(
            under.to_string(),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        if !after.is_empty() {
            spans.push(Span::styled(after, value_style));
        }

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut input = TextInput::new();
        for c in "45.0".chars() {
            input.insert(c);
        }
        assert_eq!(input.value(), "45.0");

        input.backspace();
        input.insert('5');
        assert_eq!(input.value(), "45.5");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_cursor_editing_in_the_middle() {
        let mut input = TextInput::new().content("Cofee");
        input.move_left();
        input.move_left();
        input.insert('f');
        assert_eq!(input.value(), "Coffee");

        input.move_start();
        input.delete();
        assert_eq!(input.value(), "offee");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = TextInput::new().content("Café");
        input.backspace();
        assert_eq!(input.value(), "Caf");
        input.insert('é');
        input.move_left();
        input.delete();
        assert_eq!(input.value(), "Caf");
    }

    #[test]
    fn test_line_shows_placeholder_when_unfocused() {
        let input = TextInput::new().label("Date").placeholder("today");
        let line = input.line(6);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "  Date: today");
    }
}
