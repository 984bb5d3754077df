//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::TallyError;
use crate::models::{Budget, BudgetId, DateRange};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<BudgetId, Budget>>, TallyError> {
        self.data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<BudgetId, Budget>>, TallyError> {
        self.data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: BudgetData = read_json(&self.path)?;
        let mut data = self.write()?;

        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.id, budget);
        }

        debug!(count = data.len(), "loaded budgets");
        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let file_data = BudgetData {
            budgets: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn create(&self, budget: Budget) -> Result<BudgetId, TallyError> {
        let id = budget.id;
        self.write()?.insert(id, budget);
        Ok(id)
    }

    /// Replace a stored budget
    pub fn update(&self, budget: Budget) -> Result<(), TallyError> {
        let mut data = self.write()?;
        if !data.contains_key(&budget.id) {
            return Err(TallyError::budget_not_found(budget.id.to_string()));
        }
        data.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<Option<Budget>, TallyError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, TallyError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All budgets ordered by category, then by period start
    pub fn get_all(&self) -> Result<Vec<Budget>, TallyError> {
        let mut budgets: Vec<_> = self.read()?.values().cloned().collect();
        budgets.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then(a.period.map(|p| p.start).cmp(&b.period.map(|p| p.start)))
        });
        Ok(budgets)
    }

    /// Budget for a category whose range contains `date`
    ///
    /// Falls back to the earliest budget for the category when none covers
    /// the date. A budget without a stored range covers every date.
    pub fn find_covering(
        &self,
        category: &str,
        date: NaiveDate,
    ) -> Result<Option<Budget>, TallyError> {
        let candidates: Vec<_> = self
            .get_all()?
            .into_iter()
            .filter(|b| b.category == category)
            .collect();

        let covering = candidates
            .iter()
            .position(|b| b.period.map_or(true, |p| p.contains(date)));
        Ok(match covering {
            Some(index) => candidates.into_iter().nth(index),
            None => candidates.into_iter().next(),
        })
    }

    /// Budget covering exactly this category and range
    pub fn find_by_category_and_range(
        &self,
        category: &str,
        range: &DateRange,
    ) -> Result<Option<Budget>, TallyError> {
        Ok(self
            .read()?
            .values()
            .find(|b| b.matches(category, range))
            .cloned())
    }

    /// Find a budget by full UUID or the short ID shown in listings
    pub fn find_by_reference(&self, reference: &str) -> Result<Option<Budget>, TallyError> {
        let data = self.read()?;
        let mut matches = data.values().filter(|b| b.id.matches_reference(reference));
        match (matches.next(), matches.next()) {
            (Some(budget), None) => Ok(Some(budget.clone())),
            _ => Ok(None),
        }
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    fn range(m1: u32, d1: u32, m2: u32, d2: u32) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, m1, d1).unwrap(),
            NaiveDate::from_ymd_opt(2025, m2, d2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_find_covering_picks_range_with_date() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create(Budget::new("Groceries", Money::from_cents(10000), range(11, 1, 11, 30)))
            .unwrap();
        repo.create(Budget::new("Groceries", Money::from_cents(20000), range(12, 1, 12, 31)))
            .unwrap();

        let day = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        let dec = repo.find_covering("Groceries", day(12, 5)).unwrap().unwrap();
        assert_eq!(dec.amount, Money::from_cents(20000));

        let nov = repo.find_covering("Groceries", day(11, 30)).unwrap().unwrap();
        assert_eq!(nov.amount, Money::from_cents(10000));

        // Nothing covers October: earliest budget
        let fallback = repo.find_covering("Groceries", day(10, 1)).unwrap().unwrap();
        assert_eq!(fallback.amount, Money::from_cents(10000));

        assert!(repo.find_covering("Travel", day(12, 5)).unwrap().is_none());
    }

    #[test]
    fn test_find_by_category_and_range_is_exact() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create(Budget::new("Groceries", Money::from_cents(50000), range(12, 1, 12, 31)))
            .unwrap();

        assert!(repo
            .find_by_category_and_range("Groceries", &range(12, 1, 12, 31))
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_category_and_range("Groceries", &range(12, 1, 12, 30))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_and_persist() {
        let (temp_dir, repo) = create_test_repo();
        let mut budget = Budget::new("Rent", Money::from_cents(120000), range(1, 1, 12, 31));
        repo.create(budget.clone()).unwrap();

        budget.amount = Money::from_cents(130000);
        repo.update(budget.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        reloaded.load().unwrap();
        assert_eq!(
            reloaded.get(budget.id).unwrap().unwrap().amount,
            Money::from_cents(130000)
        );
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = Budget::new("Rent", Money::from_cents(100), range(1, 1, 1, 31));
        assert!(repo.update(budget).unwrap_err().is_not_found());
    }
}
