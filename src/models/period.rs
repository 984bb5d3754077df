//! Date ranges for budgets and reports
//!
//! Budgets cover an inclusive custom range. Reports are scoped to the
//! current month, the current year, or everything.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`
    pub fn month_containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month
            .map(|d| d - Duration::days(1))
            .unwrap_or(start);
        Self { start, end }
    }

    /// The calendar year containing `date`
    pub fn year_containing(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
        Self { start, end }
    }

    /// Check if a date falls within this range (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Format both ends with a strftime pattern
    pub fn format(&self, date_format: &str) -> String {
        format!(
            "{} - {}",
            self.start.format(date_format),
            self.end.format(date_format)
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Errors building a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    UnknownReportPeriod(String),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            Self::UnknownReportPeriod(s) => {
                write!(f, "Unknown period '{}'. Use all, month or year", s)
            }
        }
    }
}

impl std::error::Error for PeriodError {}

/// Scope of a category report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPeriod {
    #[default]
    Month,
    Year,
    All,
}

impl ReportPeriod {
    /// Date range for this period relative to `today` (`None` means unbounded)
    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        match self {
            Self::Month => Some(DateRange::month_containing(today)),
            Self::Year => Some(DateRange::year_containing(today)),
            Self::All => None,
        }
    }

    /// Heading for a report, e.g. "October 2026", "2026" or "All"
    pub fn label(&self, today: NaiveDate) -> String {
        match self {
            Self::Month => today.format("%B %Y").to_string(),
            Self::Year => today.year().to_string(),
            Self::All => "All".to_string(),
        }
    }

    /// Next period in the TUI cycle
    pub fn next(self) -> Self {
        match self {
            Self::Month => Self::Year,
            Self::Year => Self::All,
            Self::All => Self::Month,
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            _ => Err(PeriodError::UnknownReportPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
            Self::All => write!(f, "all"),
        }
    }
}
