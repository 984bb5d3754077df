//! Transaction repository for JSON storage
//!
//! Manages loading and saving the ledger to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::TallyError;
use crate::models::{DateRange, Money, Transaction, TransactionId, TransactionType};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of transactions.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for the transaction ledger
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<TransactionId, Transaction>>, TallyError> {
        self.data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<TransactionId, Transaction>>, TallyError> {
        self.data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: TransactionData = read_json(&self.path)?;
        let mut data = self.write()?;

        data.clear();
        for txn in file_data.transactions {
            data.insert(txn.id, txn);
        }

        debug!(count = data.len(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), TallyError> {
        let file_data = TransactionData {
            transactions: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Store a new transaction and return its ID
    pub fn create(&self, txn: Transaction) -> Result<TransactionId, TallyError> {
        let id = txn.id;
        self.write()?.insert(id, txn);
        Ok(id)
    }

    /// Insert many transactions under one lock
    pub fn create_many(&self, txns: Vec<Transaction>) -> Result<usize, TallyError> {
        let mut data = self.write()?;
        let count = txns.len();
        for txn in txns {
            data.insert(txn.id, txn);
        }
        Ok(count)
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All transactions ordered by date descending, newest entry first on ties
    pub fn get_all(&self) -> Result<Vec<Transaction>, TallyError> {
        let mut transactions: Vec<_> = self.read()?.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    pub fn get_by_type(&self, kind: TransactionType) -> Result<Vec<Transaction>, TallyError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.kind == kind)
            .collect())
    }

    pub fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<Transaction>, TallyError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| range.contains(t.date))
            .collect())
    }

    /// Find a transaction by full UUID or the short ID shown in listings
    ///
    /// An ambiguous short reference matches nothing.
    pub fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>, TallyError> {
        let data = self.read()?;
        let mut matches = data.values().filter(|t| t.id.matches_reference(reference));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(Some(txn.clone())),
            _ => Ok(None),
        }
    }

    /// Remove a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        Ok(self.read()?.len())
    }

    /// Sum of amounts for one category and type within an inclusive range
    pub fn sum(
        &self,
        category: &str,
        kind: TransactionType,
        range: &DateRange,
    ) -> Result<Money, TallyError> {
        Ok(self
            .read()?
            .values()
            .filter(|t| t.category == category && t.kind == kind && range.contains(t.date))
            .map(|t| t.amount)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn txn(day: u32, desc: &str, cents: i64, category: &str, kind: TransactionType) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
            desc,
            Money::from_cents(cents),
            category,
            kind,
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let id = repo
            .create(txn(1, "Coffee", 450, "Restaurants", TransactionType::Expense))
            .unwrap();

        let stored = repo.get(id).unwrap().unwrap();
        assert_eq!(stored.description, "Coffee");
    }

    #[test]
    fn test_get_all_sorted_by_date_desc() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create(txn(5, "Mid", 100, "A", TransactionType::Expense)).unwrap();
        repo.create(txn(20, "Late", 100, "A", TransactionType::Expense)).unwrap();
        repo.create(txn(1, "Early", 100, "A", TransactionType::Expense)).unwrap();

        let all = repo.get_all().unwrap();
        let descriptions: Vec<_> = all.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Late", "Mid", "Early"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.create(txn(3, "Payroll", 250000, "Salary", TransactionType::Income)).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
        assert_eq!(
            reloaded.get_by_type(TransactionType::Income).unwrap()[0].description,
            "Payroll"
        );
    }

    #[test]
    fn test_sum_respects_category_type_and_range() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create(txn(1, "A", 1000, "Groceries", TransactionType::Expense)).unwrap();
        repo.create(txn(31, "B", 2000, "Groceries", TransactionType::Expense)).unwrap();
        repo.create(txn(15, "Refund", 500, "Groceries", TransactionType::Income)).unwrap();
        repo.create(txn(15, "Other", 700, "Dining", TransactionType::Expense)).unwrap();

        let first_half = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
        )
        .unwrap();
        let month = DateRange::month_containing(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());

        assert_eq!(
            repo.sum("Groceries", TransactionType::Expense, &month).unwrap(),
            Money::from_cents(3000)
        );
        assert_eq!(
            repo.sum("Groceries", TransactionType::Expense, &first_half).unwrap(),
            Money::from_cents(1000)
        );
        assert_eq!(
            repo.sum("Groceries", TransactionType::Income, &month).unwrap(),
            Money::from_cents(500)
        );
    }

    #[test]
    fn test_find_by_reference_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let id = repo
            .create(txn(1, "Coffee", 450, "Restaurants", TransactionType::Expense))
            .unwrap();

        let found = repo.find_by_reference(&id.to_string()).unwrap().unwrap();
        assert_eq!(found.id, id);

        let removed = repo.delete(id).unwrap();
        assert!(removed.is_some());
        assert!(repo.get(id).unwrap().is_none());
        assert!(repo.delete(id).unwrap().is_none());
    }
}
