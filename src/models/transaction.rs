//! Transaction model
//!
//! A transaction is a dated income or expense entry. The amount is always a
//! positive magnitude; the direction lives in [`TransactionType`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;
use super::money::Money;

/// Category assigned when nothing else applies
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Capitalized name for tables and headings
    pub fn title(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(TransactionValidationError::UnknownType(s.to_string())),
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Calendar day of the transaction
    pub date: NaiveDate,

    pub description: String,

    /// Positive magnitude
    pub amount: Money,

    pub category: String,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// When the record was stored
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction with a fresh ID and creation timestamp
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        category: impl Into<String>,
        kind: TransactionType,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            description: description.into(),
            amount,
            category: category.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.trim().is_empty() || self.category == UNCATEGORIZED
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    UnknownType(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero, got {}", amount)
            }
            Self::UnknownType(s) => {
                write!(f, "Type must be either 'income' or 'expense', got '{}'", s)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
