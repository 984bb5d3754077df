//! Rule service
//!
//! Builds the categorization engine from the built-in table plus the user's
//! stored rules, and persists new rules.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{default_rules, CategoryRule};
use crate::services::categorizer::{self, RuleEngine};
use crate::storage::Storage;

/// Service for categorization rules
pub struct RuleService<'a> {
    storage: &'a Storage,
}

impl<'a> RuleService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Built-in rules followed by stored custom rules
    pub fn engine(&self) -> TallyResult<RuleEngine> {
        let mut rules = default_rules();
        rules.extend(self.storage.rules.get_all()?);
        Ok(RuleEngine::from_rules(rules))
    }

    /// Rules that were added by the user
    pub fn custom_rules(&self) -> TallyResult<Vec<CategoryRule>> {
        self.storage.rules.get_all()
    }

    /// Validate and store a custom rule
    pub fn add_rule(
        &self,
        category: &str,
        pattern: &str,
        description: &str,
        priority: i32,
    ) -> TallyResult<CategoryRule> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TallyError::Validation("Category cannot be empty".into()));
        }
        categorizer::validate_pattern(pattern)?;

        let rule = CategoryRule::new(category, pattern, description.trim(), priority);
        self.storage.rules.add(rule.clone())?;
        self.storage.rules.save()?;

        self.storage.log_create(
            EntityType::CategoryRule,
            rule.pattern.clone(),
            Some(rule.category.clone()),
            &rule,
        )?;

        info!(category = %rule.category, pattern = %rule.pattern, priority, "rule added");
        Ok(rule)
    }

    /// Check a pattern against a description
    pub fn test_rule(&self, pattern: &str, description: &str) -> TallyResult<bool> {
        categorizer::test_rule(pattern, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_engine_has_default_rules() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = RuleService::new(&storage).engine().unwrap();
        assert_eq!(engine.len(), 14);
    }

    #[test]
    fn test_custom_rule_outranks_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RuleService::new(&storage);

        service.add_rule("Coffee", "starbucks", "Coffee habit", 20).unwrap();
        let engine = service.engine().unwrap();

        assert_eq!(engine.len(), 15);
        assert_eq!(engine.categorize("STARBUCKS #12"), "Coffee");
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_custom_rules_persist() {
        let (temp_dir, storage) = create_test_storage();
        RuleService::new(&storage)
            .add_rule("Pets", "petco|petsmart", "", 10)
            .unwrap();

        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();

        let rules = RuleService::new(&reloaded).custom_rules().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].category, "Pets");
    }

    #[test]
    fn test_invalid_rule_is_not_stored() {
        let (_temp_dir, storage) = create_test_storage();
        let service = RuleService::new(&storage);

        let err = service.add_rule("Broken", "(oops", "", 10).unwrap_err();
        assert!(matches!(err, TallyError::InvalidPattern { .. }));
        assert!(service.add_rule("  ", "ok", "", 10).unwrap_err().is_validation());
        assert!(service.custom_rules().unwrap().is_empty());
    }
}
