//! Report CLI command

use std::io::IsTerminal;

use chrono::Local;
use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::display::format_category_report;
use crate::error::TallyResult;
use crate::models::{ReportPeriod, TransactionType};
use crate::reports::CategoryReport;
use crate::storage::Storage;

/// Which side of the ledger to report on
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ReportKind {
    Income,
    Expense,
}

impl From<ReportKind> for TransactionType {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Income => TransactionType::Income,
            ReportKind::Expense => TransactionType::Expense,
        }
    }
}

/// Arguments for `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// income or expense
    #[arg(value_enum)]
    pub kind: ReportKind,
    /// Time period: all, month or year
    #[arg(short, long, default_value = "month")]
    pub period: ReportPeriod,
}

/// Handle `report`
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ReportArgs,
) -> TallyResult<()> {
    let today = Local::now().date_naive();
    let report = CategoryReport::generate(storage, args.kind.into(), args.period, today)?;

    let color = std::io::stdout().is_terminal();
    print!("{}", format_category_report(&report, settings, color));
    Ok(())
}
