//! Transaction service
//!
//! Recording, listing, searching and deleting ledger entries. Adding a
//! transaction auto-categorizes it when no category is given and reports how
//! it affects the category's budget.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Transaction, TransactionType, UNCATEGORIZED};
use crate::services::budget::{BudgetImpact, BudgetService, DEFAULT_WARNING_PERCENT};
use crate::services::categorizer::RuleEngine;
use crate::storage::Storage;

/// Service for transaction management
///
/// Only `add` consults the rule engine; [`TransactionService::reader`]
/// builds a service without one for listing, search and delete.
pub struct TransactionService<'a> {
    storage: &'a Storage,
    engine: Option<&'a RuleEngine>,
    warning_percent: f64,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only this type
    pub kind: Option<TransactionType>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A limited listing and how many entries matched in total
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

impl TransactionPage {
    /// Matching entries left out by the limit
    pub fn hidden(&self) -> usize {
        self.total - self.transactions.len()
    }
}

/// Input for recording a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    /// `None` or blank runs the categorization rules
    pub category: Option<String>,
    pub kind: TransactionType,
}

/// What happened when a transaction was added
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub transaction: Transaction,
    /// Category came from the rule engine
    pub auto_categorized: bool,
    /// `None` when the category has no budget
    pub budget: Option<BudgetImpact>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage, engine: &'a RuleEngine) -> Self {
        Self {
            storage,
            engine: Some(engine),
            warning_percent: DEFAULT_WARNING_PERCENT,
        }
    }

    /// Service without categorization rules
    ///
    /// `add` stores a blank category as `Uncategorized`.
    pub fn reader(storage: &'a Storage) -> Self {
        Self {
            storage,
            engine: None,
            warning_percent: DEFAULT_WARNING_PERCENT,
        }
    }

    /// Use a different budget warning threshold for add feedback
    pub fn with_warning_percent(mut self, warning_percent: f64) -> Self {
        self.warning_percent = warning_percent;
        self
    }

    /// Validate, categorize, store and audit a new transaction
    pub fn add(&self, input: NewTransaction) -> TallyResult<AddOutcome> {
        let given = input
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let (category, auto_categorized) = match (given, self.engine) {
            (Some(category), _) => (category.to_string(), false),
            (None, Some(engine)) => (engine.categorize(&input.description), true),
            (None, None) => (UNCATEGORIZED.to_string(), false),
        };

        let txn = Transaction::new(
            input.date,
            input.description.trim(),
            input.amount,
            category,
            input.kind,
        );
        txn.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        self.storage.transactions.create(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;
        info!(id = %txn.id, category = %txn.category, amount = %txn.amount, "transaction added");

        let budget = if txn.category == UNCATEGORIZED {
            None
        } else {
            BudgetService::new(self.storage)
                .with_warning_percent(self.warning_percent)
                .impact_of(&txn)?
        };

        Ok(AddOutcome {
            transaction: txn,
            auto_categorized,
            budget,
        })
    }

    /// Transactions newest first, optionally filtered and limited
    pub fn list(&self, filter: TransactionFilter) -> TallyResult<TransactionPage> {
        let mut transactions = match filter.kind {
            Some(kind) => self.storage.transactions.get_by_type(kind)?,
            None => self.storage.transactions.get_all()?,
        };

        let total = transactions.len();
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(TransactionPage {
            transactions,
            total,
        })
    }

    /// Case-insensitive substring search over description and category
    pub fn search(&self, query: &str) -> TallyResult<Vec<Transaction>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| {
                t.description.to_lowercase().contains(&needle)
                    || t.category.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Find a transaction by full or short ID
    pub fn find(&self, reference: &str) -> TallyResult<Option<Transaction>> {
        self.storage.transactions.find_by_reference(reference)
    }

    /// Delete a transaction by full or short ID
    pub fn delete(&self, reference: &str) -> TallyResult<Transaction> {
        let txn = self
            .find(reference)?
            .ok_or_else(|| TallyError::transaction_not_found(reference))?;

        self.storage.transactions.delete(txn.id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        Ok(txn)
    }

    pub fn count(&self) -> TallyResult<usize> {
        self.storage.transactions.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::DateRange;
    use crate::services::budget::BudgetStatus;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(description: &str, cents: i64, category: Option<&str>) -> NewTransaction {
        NewTransaction {
            date: date(2025, 12, 10),
            description: description.to_string(),
            amount: Money::from_cents(cents),
            category: category.map(String::from),
            kind: TransactionType::Expense,
        }
    }

    #[test]
    fn test_add_with_explicit_category() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::with_default_rules();
        let service = TransactionService::new(&storage, &engine);

        let outcome = service.add(input("Whole Foods", 4500, Some("Food"))).unwrap();

        assert_eq!(outcome.transaction.category, "Food");
        assert!(!outcome.auto_categorized);
        assert!(outcome.budget.is_none());
        assert_eq!(service.count().unwrap(), 1);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_add_auto_categorizes_blank_category() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::with_default_rules();
        let service = TransactionService::new(&storage, &engine);

        let outcome = service.add(input("Starbucks Coffee", 450, Some("  "))).unwrap();
        assert_eq!(outcome.transaction.category, "Restaurants");
        assert!(outcome.auto_categorized);

        let outcome = service.add(input("Unknown thing", 450, None)).unwrap();
        assert_eq!(outcome.transaction.category, UNCATEGORIZED);
        assert!(outcome.auto_categorized);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::new();
        let service = TransactionService::new(&storage, &engine);

        assert!(service.add(input("  ", 100, None)).unwrap_err().is_validation());
        assert!(service.add(input("Thing", 0, None)).unwrap_err().is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_add_reports_budget_impact() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::with_default_rules();
        let range = DateRange::new(date(2025, 12, 1), date(2025, 12, 31)).unwrap();
        BudgetService::new(&storage)
            .set("Groceries", Money::from_cents(10000), range)
            .unwrap();

        let service = TransactionService::new(&storage, &engine);
        service.add(input("Whole Foods", 7000, None)).unwrap();
        let outcome = service.add(input("Safeway", 1500, None)).unwrap();

        match outcome.budget {
            Some(BudgetImpact::Checked(result)) => {
                assert_eq!(result.used, Money::from_cents(8500));
                assert_eq!(result.status, BudgetStatus::Warning);
            }
            other => panic!("unexpected impact: {:?}", other),
        }
    }

    #[test]
    fn test_list_filter_and_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::reader(&storage);

        for i in 1..=3 {
            let mut new = input(&format!("Item {}", i), 100 * i, Some("Misc"));
            new.date = date(2025, 12, i as u32);
            service.add(new).unwrap();
        }
        let mut pay = input("Paycheck", 100000, Some("Salary"));
        pay.kind = TransactionType::Income;
        service.add(pay).unwrap();

        let page = service
            .list(TransactionFilter::new().kind(TransactionType::Expense).limit(2))
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.hidden(), 1);
        assert_eq!(page.transactions[0].description, "Item 3");

        let all = service.list(TransactionFilter::new()).unwrap();
        assert_eq!(all.total, 4);
        assert_eq!(all.hidden(), 0);
    }

    #[test]
    fn test_search_matches_description_and_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::reader(&storage);

        service.add(input("Morning COFFEE", 300, Some("Treats"))).unwrap();
        service.add(input("Bus pass", 5000, Some("Coffee Fund"))).unwrap();
        service.add(input("Rent", 90000, Some("Housing"))).unwrap();

        assert_eq!(service.search("coffee").unwrap().len(), 2);
        assert!(service.search("pizza").unwrap().is_empty());
    }

    #[test]
    fn test_delete_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::reader(&storage);

        let txn = service.add(input("Thing", 100, Some("Misc"))).unwrap().transaction;
        let deleted = service.delete(&txn.id.to_string()).unwrap();

        assert_eq!(deleted.id, txn.id);
        assert_eq!(service.count().unwrap(), 0);
        assert!(service.delete(&txn.id.to_string()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_reader_leaves_blank_category_uncategorized() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::reader(&storage);

        let outcome = service.add(input("Whole Foods", 4200, None)).unwrap();
        assert_eq!(outcome.transaction.category, UNCATEGORIZED);
        assert!(!outcome.auto_categorized);
        assert!(outcome.budget.is_none());

        let engine = RuleEngine::with_default_rules();
        let categorized = TransactionService::new(&storage, &engine)
            .add(input("Whole Foods", 4200, None))
            .unwrap();
        assert_eq!(categorized.transaction.category, "Groceries");

        let page = service.list(TransactionFilter::new()).unwrap();
        assert_eq!(page.total, 2);
    }
}
