//! Custom categorization rules, stored in rules.json
//!
//! Only user-added rules are persisted; the built-in table lives in code.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::CategoryRule;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RuleData {
    rules: Vec<CategoryRule>,
}

/// Repository for user-defined rules, kept in insertion order
pub struct RuleRepository {
    path: PathBuf,
    data: RwLock<Vec<CategoryRule>>,
}

impl RuleRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: RuleData = read_json(&self.path)?;
        let mut data = self
            .data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.rules;
        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let file_data = RuleData {
            rules: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Append a rule
    pub fn add(&self, rule: CategoryRule) -> Result<(), TallyError> {
        self.data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?
            .push(rule);
        Ok(())
    }

    pub fn get_all(&self) -> Result<Vec<CategoryRule>, TallyError> {
        Ok(self
            .data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?
            .clone())
    }
}
