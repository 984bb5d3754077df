//! Budget model
//!
//! A budget sets a target amount for one category over an inclusive date
//! range. The same record serves as a spending ceiling for expenses and as a
//! goal for income categories.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;
use super::period::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub category: String,

    /// Ceiling for expenses, goal for income
    pub amount: Money,

    /// Inclusive period; absent only in hand-edited data files
    #[serde(default)]
    pub period: Option<DateRange>,
}

impl Budget {
    /// Create a budget over a custom range
    pub fn new(category: impl Into<String>, amount: Money, period: DateRange) -> Self {
        Self {
            id: BudgetId::new(),
            category: category.into(),
            amount,
            period: Some(period),
        }
    }

    /// Whether this budget covers exactly the given category and range
    pub fn matches(&self, category: &str, period: &DateRange) -> bool {
        self.category == category && self.period.as_ref() == Some(period)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::EmptyCategory);
        }

        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }

        Ok(())
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyCategory,
    NonPositiveAmount(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Budget category cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be greater than zero, got {}", amount)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn december() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_matches_exact_range_only() {
        let budget = Budget::new("Groceries", Money::from_cents(50000), december());
        assert!(budget.matches("Groceries", &december()));
        assert!(!budget.matches("Dining", &december()));

        let partial = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
        )
        .unwrap();
        assert!(!budget.matches("Groceries", &partial));
    }

    #[test]
    fn test_validation() {
        let budget = Budget::new("Groceries", Money::zero(), december());
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveAmount(_))
        ));

        let budget = Budget::new(" ", Money::from_cents(100), december());
        assert_eq!(budget.validate(), Err(BudgetValidationError::EmptyCategory));
    }

    #[test]
    fn test_missing_period_deserializes() {
        let json = r#"{"id":"550e8400-e29b-41d4-a716-446655440000","category":"Rent","amount":120000}"#;
        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.period, None);
    }
}
