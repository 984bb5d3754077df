//! Report formatting for terminal output
//!
//! The category report is printed as a horizontal bar chart followed by a
//! breakdown table. Bar colors come from a [`CategoryPalette`] built for the
//! report being drawn, so the breakdown's color markers match the bars.

use crate::config::Settings;
use crate::models::Money;
use crate::reports::CategoryReport;

/// 256-color terminal indices cycled through for report bars
pub const PALETTE: [u8; 8] = [10, 14, 11, 13, 9, 12, 208, 165];

const LABEL_WIDTH: usize = 15;
const BAR_WIDTH: usize = 40;

/// Color assignment for the categories of one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPalette {
    colors: Vec<(String, u8)>,
}

impl CategoryPalette {
    /// Assign palette colors in report order (largest category first)
    pub fn for_report(report: &CategoryReport) -> Self {
        let colors = report
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.category.clone(), PALETTE[i % PALETTE.len()]))
            .collect();
        Self { colors }
    }

    /// Terminal color index for a category in this report
    pub fn color_of(&self, category: &str) -> Option<u8> {
        self.colors
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, color)| *color)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Wrap text in a 256-color foreground escape
fn paint(text: &str, color: Option<u8>, enabled: bool) -> String {
    match color {
        Some(index) if enabled => format!("\x1b[38;5;{}m{}\x1b[0m", index, text),
        _ => text.to_string(),
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

/// Scale `value` to a bar of at most `width` cells
pub fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if !max_value.is_positive() || !value.is_positive() {
        return String::new();
    }

    let filled = (value.as_f64() / max_value.as_f64() * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Render the bar chart and return the palette it used
pub fn render_bar_chart(
    report: &CategoryReport,
    settings: &Settings,
    color: bool,
) -> (String, CategoryPalette) {
    let palette = CategoryPalette::for_report(report);
    let max = report.max_amount();

    let mut output = String::new();
    for entry in &report.entries {
        let bar = format_bar(entry.amount, max, BAR_WIDTH);
        output.push_str(&format!(
            "{:<width$} {} {}\n",
            truncate(&entry.category, LABEL_WIDTH),
            paint(&bar, palette.color_of(&entry.category), color),
            settings.format_money(entry.amount),
            width = LABEL_WIDTH
        ));
    }

    (output, palette)
}

/// Full text of a category report
pub fn format_category_report(report: &CategoryReport, settings: &Settings, color: bool) -> String {
    let title = report.kind.title();
    let mut output = String::new();

    output.push_str(&format!("{} Report - {}\n", title, report.label));
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "Total {}: {}\n\n",
        title,
        settings.format_money(report.total)
    ));

    if report.is_empty() {
        output.push_str(&format!(
            "No {} transactions found for this period.\n",
            report.kind
        ));
        return output;
    }

    let (chart, palette) = render_bar_chart(report, settings, color);
    output.push_str("Category Breakdown Chart:\n");
    output.push_str(&chart);

    output.push_str("\nBreakdown by Category:\n");
    output.push_str(&separator(45));
    output.push('\n');
    for entry in &report.entries {
        output.push_str(&format!(
            "  {} {:<20} {:>12}  ({})\n",
            paint("█", palette.color_of(&entry.category), color),
            truncate(&entry.category, 20),
            settings.format_money(entry.amount),
            format_percentage(entry.percentage)
        ));
    }

    output
}
