//! Screen regions for the TUI
//!
//! A fixed-width sidebar on the left, the current screen on the right and a
//! one-line status bar along the bottom. Dialogs are drawn over the top in a
//! centered rect.

use ratatui::layout::{Constraint, Layout, Rect};

const SIDEBAR_WIDTH: u16 = 26;
const HEADER_HEIGHT: u16 = 3;

/// Top-level regions
pub struct AppLayout {
    pub sidebar: Rect,
    pub main: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [body, status_bar] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .areas(body);

        Self {
            sidebar,
            main,
            status_bar,
        }
    }
}

/// Sidebar: app title, screen menu, this month's totals
pub struct SidebarLayout {
    pub header: Rect,
    pub menu: Rect,
    pub summary: Rect,
}

impl SidebarLayout {
    pub fn new(area: Rect) -> Self {
        // Menu holds one line per screen plus borders
        let [header, menu, summary] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(7),
            Constraint::Min(3),
        ])
        .areas(area);

        Self {
            header,
            menu,
            summary,
        }
    }
}

/// Table screens: a header line of filters and hints above the table
pub struct MainPanelLayout {
    pub header: Rect,
    pub content: Rect,
}

impl MainPanelLayout {
    pub fn new(area: Rect) -> Self {
        let [header, content] =
            Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(3)]).areas(area);

        Self { header, content }
    }
}

/// Report screens: header, bar chart, breakdown table
pub struct ReportLayout {
    pub header: Rect,
    pub chart: Rect,
    pub breakdown: Rect,
}

impl ReportLayout {
    pub fn new(area: Rect) -> Self {
        let [header, chart, breakdown] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Percentage(55),
            Constraint::Min(5),
        ])
        .areas(area);

        Self {
            header,
            chart,
            breakdown,
        }
    }
}

/// A rect sized as a percentage of `area`, centered in it
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y.min(100)) / 100) as u16;
    centered_rect_fixed(width, height, area)
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout_splits() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.sidebar.width, 26);
        assert_eq!(layout.main.width, 74);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.status_bar.y, 29);
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect_fixed(60, 12, area);
        assert_eq!(rect, area);

        let rect = centered_rect_fixed(20, 4, area);
        assert_eq!((rect.x, rect.y), (10, 3));
    }

    #[test]
    fn test_centered_rect_percentages() {
        let area = Rect::new(10, 5, 100, 40);
        let rect = centered_rect(60, 50, area);
        assert_eq!((rect.width, rect.height), (60, 20));
        assert_eq!((rect.x, rect.y), (30, 15));
    }
}
