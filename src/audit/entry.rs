//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Kinds of records that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Transaction,
    Budget,
    CategoryRule,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::CategoryRule => write!(f, "CategoryRule"),
        }
    }
}

/// One line of the audit log
///
/// `before` is set for updates and deletes, `after` for creates and updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Human-readable label (description, category)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Short description of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id.into(), entity_name)
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            summary,
            ..Self::base(Operation::Update, entity_type, entity_id.into(), entity_name)
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Delete, entity_type, entity_id.into(), entity_name)
        }
    }

    /// One-line rendering for `tally config` style output
    pub fn format_human_readable(&self) -> String {
        let name = self
            .entity_name
            .as_deref()
            .map(|n| format!(" \"{}\"", n))
            .unwrap_or_default();
        let summary = self
            .summary
            .as_deref()
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        format!(
            "{} {} {} {}{}{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.entity_type,
            self.entity_id,
            name,
            summary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_entry() {
        let entity = json!({"category": "Groceries", "amount": 50000});
        let entry = AuditEntry::create(
            EntityType::Budget,
            "bud-12345678",
            Some("Groceries".into()),
            &entity,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(entity));
    }

    #[test]
    fn test_update_entry_keeps_both_sides() {
        let before = json!({"amount": 100});
        let after = json!({"amount": 200});
        let entry = AuditEntry::update(
            EntityType::Budget,
            "bud-1",
            None,
            &before,
            &after,
            Some("amount: $1.00 -> $2.00".into()),
        );

        assert_eq!(entry.before, Some(before));
        assert_eq!(entry.after, Some(after));
        assert!(entry.format_human_readable().contains("UPDATE Budget bud-1 (amount"));
    }

    #[test]
    fn test_serialized_shape() {
        let entry = AuditEntry::delete(
            EntityType::CategoryRule,
            "Pets",
            None,
            &json!({"pattern": "petco"}),
        );
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains(r#""operation":"delete""#));
        assert!(line.contains(r#""entity_type":"category_rule""#));
        assert!(!line.contains("after"));
    }
}
