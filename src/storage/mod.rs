//! Storage layer for Tally
//!
//! JSON file repositories with atomic writes, plus the audit log. Directories
//! are created on first use.

pub mod budgets;
pub mod file_io;
pub mod rules;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use rules::RuleRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TallyPaths;
use crate::error::TallyError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub rules: RuleRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            rules: RuleRepository::new(paths.rules_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TallyError> {
        self.transactions.load()?;
        self.budgets.load()?;
        self.rules.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TallyError> {
        self.transactions.save()?;
        self.budgets.save()?;
        self.rules.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> Result<(), TallyError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TallyError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Append a batch of audit entries with one write
    pub fn log_batch(&self, entries: &[AuditEntry]) -> Result<(), TallyError> {
        self.audit.log_batch(entries)
    }
}
