//! Append-only audit log writer
//!
//! Each entry is one JSON line (JSONL), flushed as soon as it is written.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{TallyError, TallyResult};

use super::entry::AuditEntry;

/// Writes and reads the audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> TallyResult<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| TallyError::Io(format!("Failed to open audit log: {}", e)))
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> TallyResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> TallyResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;
        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                TallyError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;
            writeln!(file, "{}", json)
                .map_err(|e| TallyError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| TallyError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> TallyResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| TallyError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                TallyError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                TallyError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    index + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> TallyResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (TempDir, AuditLogger) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (temp_dir, logger)
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (_temp_dir, logger) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_log_and_read_back() {
        let (_temp_dir, logger) = create_test_logger();

        logger
            .log(&AuditEntry::create(
                EntityType::Transaction,
                "txn-1",
                Some("Coffee".into()),
                &json!({"amount": 450}),
            ))
            .unwrap();
        logger
            .log(&AuditEntry::delete(
                EntityType::Transaction,
                "txn-1",
                None,
                &json!({"amount": 450}),
            ))
            .unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Delete);

        let content = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_batch_and_recent() {
        let (_temp_dir, logger) = create_test_logger();
        let entries: Vec<_> = (0..5)
            .map(|i| {
                AuditEntry::create(EntityType::Transaction, format!("txn-{}", i), None, &i)
            })
            .collect();
        logger.log_batch(&entries).unwrap();

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "txn-3");
        assert_eq!(recent[1].entity_id, "txn-4");
    }
}
