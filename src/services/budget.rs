//! Budget aggregation and budget management
//!
//! The free functions are pure: they take a budget and a borrowed ledger and
//! classify spending (or income) inside the budget's window. [`BudgetService`]
//! wraps them with persistence for the CLI and TUI.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, BudgetId, DateRange, Money, Transaction, TransactionType};
use crate::storage::Storage;

/// Percent of a budget at which spending becomes a warning
pub const DEFAULT_WARNING_PERCENT: f64 = 80.0;

/// Where a category stands against its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Expense budget below the warning threshold
    Ok,
    /// Expense budget at or above the warning threshold, not over
    Warning,
    OverBudget,
    /// Income goal reached
    TargetMet,
    /// Income goal not reached yet
    InProgress,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::OverBudget => "Over",
            Self::TargetMet => "Met",
            Self::InProgress => "In progress",
        }
    }
}

/// Result of checking a budget against the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetCheck {
    pub category: String,
    /// Window the sums were taken over
    pub range: DateRange,
    /// Spent (expense) or received (income) inside the window
    pub used: Money,
    pub target: Money,
    /// `target - used`; negative when over
    pub remaining: Money,
    /// `None` when the target is zero
    pub percent: Option<f64>,
    pub status: BudgetStatus,
}

impl BudgetCheck {
    pub fn is_income(&self) -> bool {
        matches!(self.status, BudgetStatus::TargetMet | BudgetStatus::InProgress)
    }

    /// Amount spent beyond the target
    pub fn overage(&self) -> Money {
        if self.used > self.target {
            self.used - self.target
        } else {
            Money::zero()
        }
    }
}

/// Budget feedback for a newly recorded transaction
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetImpact {
    /// The transaction date falls outside the budget's range
    OutOfPeriod { date: NaiveDate, range: DateRange },
    Checked(BudgetCheck),
}

/// Sum of expenses for `category` inside `range`
pub fn spending(ledger: &[Transaction], category: &str, range: &DateRange) -> Money {
    total(ledger, category, TransactionType::Expense, range)
}

/// Sum of income for `category` inside `range`
pub fn income(ledger: &[Transaction], category: &str, range: &DateRange) -> Money {
    total(ledger, category, TransactionType::Income, range)
}

fn total(ledger: &[Transaction], category: &str, kind: TransactionType, range: &DateRange) -> Money {
    ledger
        .iter()
        .filter(|t| t.kind == kind && t.category == category && range.contains(t.date))
        .map(|t| t.amount)
        .sum()
}

/// The window a budget applies to around `reference`
///
/// A budget without a stored range covers the calendar month of `reference`.
pub fn effective_range(budget: &Budget, reference: NaiveDate) -> DateRange {
    budget
        .period
        .unwrap_or_else(|| DateRange::month_containing(reference))
}

/// Classify expenses against an expense budget
pub fn check(
    budget: &Budget,
    ledger: &[Transaction],
    reference: NaiveDate,
    warning_percent: f64,
) -> BudgetCheck {
    let range = effective_range(budget, reference);
    let used = spending(ledger, &budget.category, &range);
    classify_spending(budget, range, used, warning_percent)
}

/// Classify income against an income goal
pub fn check_income(budget: &Budget, ledger: &[Transaction], reference: NaiveDate) -> BudgetCheck {
    let range = effective_range(budget, reference);
    let used = income(ledger, &budget.category, &range);
    classify_income(budget, range, used)
}

/// Status of `used` spending inside `range` against an expense budget
pub fn classify_spending(
    budget: &Budget,
    range: DateRange,
    used: Money,
    warning_percent: f64,
) -> BudgetCheck {
    let percent = used.percent_of(budget.amount);

    let status = if budget.amount.is_zero() {
        if used.is_zero() {
            BudgetStatus::Ok
        } else {
            BudgetStatus::OverBudget
        }
    } else if used > budget.amount {
        BudgetStatus::OverBudget
    } else if percent.is_some_and(|p| p >= warning_percent) {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Ok
    };

    build_check(budget, range, used, percent, status)
}

/// Status of `used` income inside `range` against an income goal
pub fn classify_income(budget: &Budget, range: DateRange, used: Money) -> BudgetCheck {
    let percent = used.percent_of(budget.amount);

    let status = if used >= budget.amount {
        BudgetStatus::TargetMet
    } else {
        BudgetStatus::InProgress
    };

    build_check(budget, range, used, percent, status)
}

fn build_check(
    budget: &Budget,
    range: DateRange,
    used: Money,
    percent: Option<f64>,
    status: BudgetStatus,
) -> BudgetCheck {
    BudgetCheck {
        category: budget.category.clone(),
        range,
        used,
        target: budget.amount,
        remaining: budget.amount - used,
        percent,
        status,
    }
}

/// Evaluate a budget right after `transaction` was recorded
///
/// `ledger` must already contain the transaction.
pub fn evaluate_for_transaction(
    budget: &Budget,
    transaction: &Transaction,
    ledger: &[Transaction],
    warning_percent: f64,
) -> BudgetImpact {
    if let Some(range) = budget.period {
        if !range.contains(transaction.date) {
            return BudgetImpact::OutOfPeriod {
                date: transaction.date,
                range,
            };
        }
    }

    let result = match transaction.kind {
        TransactionType::Expense => check(budget, ledger, transaction.date, warning_percent),
        TransactionType::Income => check_income(budget, ledger, transaction.date),
    };
    BudgetImpact::Checked(result)
}

/// Whether `set` created a new budget or replaced an existing one
#[derive(Debug, Clone, PartialEq)]
pub enum SetBudgetOutcome {
    Created(Budget),
    Updated { before: Budget, after: Budget },
}

impl SetBudgetOutcome {
    pub fn budget(&self) -> &Budget {
        match self {
            Self::Created(budget) => budget,
            Self::Updated { after, .. } => after,
        }
    }
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    warning_percent: f64,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            warning_percent: DEFAULT_WARNING_PERCENT,
        }
    }

    /// Use a different warning threshold
    pub fn with_warning_percent(mut self, warning_percent: f64) -> Self {
        self.warning_percent = warning_percent;
        self
    }

    pub fn warning_percent(&self) -> f64 {
        self.warning_percent
    }

    /// Set the target for a category over a range
    ///
    /// A budget with exactly this category and range is updated; any other
    /// range (overlapping or not) creates a new budget.
    pub fn set(
        &self,
        category: &str,
        amount: Money,
        range: DateRange,
    ) -> TallyResult<SetBudgetOutcome> {
        let category = category.trim();

        if let Some(existing) = self
            .storage
            .budgets
            .find_by_category_and_range(category, &range)?
        {
            let mut updated = existing.clone();
            updated.amount = amount;
            updated
                .validate()
                .map_err(|e| TallyError::Validation(e.to_string()))?;

            self.storage.budgets.update(updated.clone())?;
            self.storage.budgets.save()?;

            self.storage.log_update(
                EntityType::Budget,
                updated.id.to_string(),
                Some(updated.category.clone()),
                &existing,
                &updated,
                Some(format!("amount: {} -> {}", existing.amount, updated.amount)),
            )?;

            return Ok(SetBudgetOutcome::Updated {
                before: existing,
                after: updated,
            });
        }

        let budget = Budget::new(category, amount, range);
        budget
            .validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        self.storage.budgets.create(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &budget,
        )?;

        info!(category = %budget.category, amount = %budget.amount, "budget created");
        Ok(SetBudgetOutcome::Created(budget))
    }

    /// All budgets, by category then start date
    pub fn list(&self) -> TallyResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// Budget for a category that covers `date`
    ///
    /// With several budgets for one category, the one whose range contains
    /// the date wins; otherwise the earliest one is returned.
    pub fn find_for_category(
        &self,
        category: &str,
        date: NaiveDate,
    ) -> TallyResult<Option<Budget>> {
        self.storage.budgets.find_covering(category, date)
    }

    /// Every budget with its expense check
    pub fn overview(&self, today: NaiveDate) -> TallyResult<Vec<(Budget, BudgetCheck)>> {
        self.list()?
            .into_iter()
            .map(|budget| {
                let result = self.check_budget(&budget, TransactionType::Expense, today)?;
                Ok((budget, result))
            })
            .collect()
    }

    /// Expense check for the category's budget covering `today`
    pub fn check(&self, category: &str, today: NaiveDate) -> TallyResult<Option<BudgetCheck>> {
        let Some(budget) = self.find_for_category(category, today)? else {
            return Ok(None);
        };
        self.check_budget(&budget, TransactionType::Expense, today)
            .map(Some)
    }

    /// Income check for the category's budget covering `today`
    pub fn check_income(
        &self,
        category: &str,
        today: NaiveDate,
    ) -> TallyResult<Option<BudgetCheck>> {
        let Some(budget) = self.find_for_category(category, today)? else {
            return Ok(None);
        };
        self.check_budget(&budget, TransactionType::Income, today)
            .map(Some)
    }

    /// Budget feedback for a transaction that has already been stored
    ///
    /// Uses the budget whose range contains the transaction date; reports
    /// `OutOfPeriod` only when no budget for the category covers it.
    pub fn impact_of(&self, transaction: &Transaction) -> TallyResult<Option<BudgetImpact>> {
        let Some(budget) = self.find_for_category(&transaction.category, transaction.date)?
        else {
            return Ok(None);
        };

        if let Some(range) = budget.period {
            if !range.contains(transaction.date) {
                return Ok(Some(BudgetImpact::OutOfPeriod {
                    date: transaction.date,
                    range,
                }));
            }
        }

        let result = self.check_budget(&budget, transaction.kind, transaction.date)?;
        Ok(Some(BudgetImpact::Checked(result)))
    }

    /// Classify one budget against the repository sum for its window
    fn check_budget(
        &self,
        budget: &Budget,
        kind: TransactionType,
        reference: NaiveDate,
    ) -> TallyResult<BudgetCheck> {
        let range = effective_range(budget, reference);
        let used = self
            .storage
            .transactions
            .sum(&budget.category, kind, &range)?;

        Ok(match kind {
            TransactionType::Expense => {
                classify_spending(budget, range, used, self.warning_percent)
            }
            TransactionType::Income => classify_income(budget, range, used),
        })
    }

    /// Delete a budget by full or short ID
    pub fn delete(&self, reference: &str) -> TallyResult<Budget> {
        let budget = self
            .storage
            .budgets
            .find_by_reference(reference)?
            .ok_or_else(|| TallyError::budget_not_found(reference))?;

        self.delete_by_id(budget.id)
    }

    pub fn delete_by_id(&self, id: BudgetId) -> TallyResult<Budget> {
        let budget = self
            .storage
            .budgets
            .delete(id)?
            .ok_or_else(|| TallyError::budget_not_found(id.to_string()))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.category.clone()),
            &budget,
        )?;

        Ok(budget)
    }
}
