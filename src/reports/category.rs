//! Category Report
//!
//! Totals income or expenses by category over a report period.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::TallyResult;
use crate::models::{DateRange, Money, ReportPeriod, Transaction, TransactionType};
use crate::storage::Storage;

/// One category's share of the report
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
    pub transaction_count: usize,
    /// Share of the report total; zero when the total is zero
    pub percentage: f64,
}

/// Income or expenses grouped by category
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub kind: TransactionType,
    pub period: ReportPeriod,
    /// Heading such as "October 2026", "2026" or "All"
    pub label: String,
    /// `None` for all time
    pub range: Option<DateRange>,
    pub total: Money,
    /// Largest first, ties by category name
    pub entries: Vec<CategoryTotal>,
}

impl CategoryReport {
    /// Generate a report from the stored ledger
    pub fn generate(
        storage: &Storage,
        kind: TransactionType,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> TallyResult<Self> {
        let transactions = storage.transactions.get_by_type(kind)?;
        Ok(Self::from_transactions(&transactions, kind, period, today))
    }

    /// Build a report from any slice of transactions
    pub fn from_transactions(
        transactions: &[Transaction],
        kind: TransactionType,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Self {
        let range = period.range(today);

        let mut by_category: HashMap<&str, (Money, usize)> = HashMap::new();
        let mut total = Money::zero();

        for txn in transactions {
            if txn.kind != kind || range.is_some_and(|r| !r.contains(txn.date)) {
                continue;
            }
            let entry = by_category
                .entry(txn.category.as_str())
                .or_insert((Money::zero(), 0));
            entry.0 += txn.amount;
            entry.1 += 1;
            total += txn.amount;
        }

        let mut entries: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, (amount, count))| CategoryTotal {
                category: category.to_string(),
                amount,
                transaction_count: count,
                percentage: amount.percent_of(total).unwrap_or(0.0),
            })
            .collect();
        entries.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));

        Self {
            kind,
            period,
            label: period.label(today),
            range,
            total,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest single category amount
    pub fn max_amount(&self) -> Money {
        self.entries
            .first()
            .map(|e| e.amount)
            .unwrap_or_else(Money::zero)
    }
}
