//! CSV import
//!
//! [`CsvNormalizer`] turns a bank export into transaction candidates: it finds
//! the date, description and amount columns from the header row, sniffs date
//! and amount notations, and infers income vs expense. Bad rows are skipped
//! with a [`RowWarning`]; only a header without the required columns fails
//! the whole file.
//!
//! [`ImportService`] runs the normalizer against a file and then optionally
//! drops duplicates and auto-categorizes before saving.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Transaction, TransactionType, UNCATEGORIZED};
use crate::services::categorizer::RuleEngine;
use crate::services::duplicate;
use crate::storage::Storage;

/// Description used when the source row has none
pub const DEFAULT_DESCRIPTION: &str = "Imported transaction";

/// Date-only formats, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%d-%b-%Y",
];

/// Date-time formats, tried after the date-only list
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];

/// Column positions detected from a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub category: Option<usize>,
    /// Explicit credit/debit column, overrides the amount's sign
    pub kind: Option<usize>,
}

impl ColumnMap {
    /// Detect columns from header labels
    ///
    /// Every header is checked against every role. For date, description and
    /// amount the last matching header wins; for category the first one does.
    pub fn detect<'a, I>(headers: I) -> TallyResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut date = None;
        let mut description = None;
        let mut amount = None;
        let mut category = None;
        let mut kind = None;

        for (index, header) in headers.into_iter().enumerate() {
            let h = header.trim().to_lowercase();

            if h.contains("date") || h == "posted" {
                date = Some(index);
            }
            if h.contains("description")
                || h.contains("memo")
                || h.contains("merchant")
                || h == "payee"
            {
                description = Some(index);
            }
            if h.contains("amount") || h == "debit" || h == "credit" {
                amount = Some(index);
            }
            if (h.contains("category") || h.contains("type")) && category.is_none() {
                category = Some(index);
            }
            if h == "type" || h == "transaction type" {
                kind = Some(index);
            }
        }

        match (date, description, amount) {
            (Some(date), Some(description), Some(amount)) => Ok(Self {
                date,
                description,
                amount,
                category,
                kind,
            }),
            _ => {
                let missing = [("date", date), ("description", description), ("amount", amount)]
                    .into_iter()
                    .filter(|(_, found)| found.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(TallyError::MissingRequiredColumns { missing })
            }
        }
    }
}

/// A data row that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub message: String,
}

/// Normalized output of one file
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<RowWarning>,
}

/// Parse a date in any of the accepted notations
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .map(|dt| dt.date())
        })
}

/// Parse an amount cell into a magnitude and a direction
///
/// A leading `+` or trailing `CR` means income; a leading `-`, trailing `DR`
/// or no marker means expense. Parentheses always mean expense.
pub fn parse_amount(s: &str) -> Result<(Money, TransactionType), String> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
        .collect();
    let mut value = cleaned.trim();
    let mut kind = TransactionType::Expense;

    if let Some(rest) = value.strip_prefix('+') {
        kind = TransactionType::Income;
        value = rest;
    } else if let Some(rest) = value.strip_prefix('-') {
        value = rest;
    } else if let Some(rest) = value.strip_suffix("CR").or_else(|| value.strip_suffix("Cr")) {
        kind = TransactionType::Income;
        value = rest;
    } else if let Some(rest) = value.strip_suffix("DR").or_else(|| value.strip_suffix("Dr")) {
        value = rest;
    }

    if let Some(inner) = value.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        value = inner;
        kind = TransactionType::Expense;
    }

    let amount = Money::parse(value.trim()).map_err(|e| e.to_string())?;
    Ok((amount.abs(), kind))
}

/// Interpret an explicit type cell, if it names a direction
pub fn parse_type_cell(s: &str) -> Option<TransactionType> {
    match s.trim().to_lowercase().as_str() {
        "credit" | "deposit" | "income" => Some(TransactionType::Income),
        "debit" | "withdrawal" | "expense" => Some(TransactionType::Expense),
        _ => None,
    }
}

/// Converts CSV bank exports into transactions
#[derive(Debug, Clone, Default)]
pub struct CsvNormalizer;

impl CsvNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV text
    pub fn parse_str(&self, data: &str) -> TallyResult<ImportBatch> {
        self.parse_reader(data.as_bytes())
    }

    /// Parse CSV from any reader; the first record is the header row
    pub fn parse_reader<R: Read>(&self, reader: R) -> TallyResult<ImportBatch> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| TallyError::Import(format!("Failed to read header: {}", e)))?
            .clone();
        let columns = ColumnMap::detect(headers.iter())?;

        let mut batch = ImportBatch::default();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let outcome = result
                .map_err(|e| format!("unreadable row: {}", e))
                .and_then(|record| self.parse_record(&record, &columns));

            match outcome {
                Ok(txn) => batch.transactions.push(txn),
                Err(message) => {
                    warn!(row, %message, "skipping CSV row");
                    batch.warnings.push(RowWarning { row, message });
                }
            }
        }

        Ok(batch)
    }

    /// Normalize a single data row
    pub fn parse_record(
        &self,
        record: &StringRecord,
        columns: &ColumnMap,
    ) -> Result<Transaction, String> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .map(str::trim)
                .ok_or_else(|| format!("missing {} field", name))
        };

        let date_str = field(columns.date, "date")?;
        let date = parse_date(date_str).ok_or_else(|| format!("invalid date '{}'", date_str))?;

        let amount_str = field(columns.amount, "amount")?;
        let (amount, mut kind) = parse_amount(amount_str)
            .map_err(|e| format!("invalid amount '{}': {}", amount_str, e))?;
        if amount.is_zero() {
            return Err(format!("amount '{}' is zero", amount_str));
        }

        if let Some(explicit) = columns
            .kind
            .and_then(|index| record.get(index))
            .and_then(parse_type_cell)
        {
            kind = explicit;
        }

        let description = match field(columns.description, "description")? {
            "" => DEFAULT_DESCRIPTION.to_string(),
            text => text.to_string(),
        };

        let category = columns
            .category
            .and_then(|index| record.get(index))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        Ok(Transaction::new(date, description, amount, category, kind))
    }
}

/// Switches for one import run
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Run `Uncategorized` rows through the rule engine
    pub auto_categorize: bool,
    /// Drop rows that exactly match a stored or earlier row
    pub skip_duplicates: bool,
}

/// What an import did
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Rows that normalized successfully
    pub found: usize,
    pub imported: Vec<Transaction>,
    pub skipped_duplicates: usize,
    /// Rows that could not be normalized
    pub warnings: Vec<RowWarning>,
    /// Rows the rule engine assigned a category to
    pub auto_categorized: usize,
}

impl ImportSummary {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Imported rows that ended up with a real category
    pub fn categorized_count(&self) -> usize {
        self.imported.iter().filter(|t| !t.is_uncategorized()).count()
    }

    pub fn error_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Imports CSV files into storage
pub struct ImportService<'a> {
    storage: &'a Storage,
    engine: &'a RuleEngine,
    normalizer: CsvNormalizer,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, engine: &'a RuleEngine) -> Self {
        Self {
            storage,
            engine,
            normalizer: CsvNormalizer::new(),
        }
    }

    /// Import a CSV file from disk
    pub fn import_file(&self, path: &Path, options: ImportOptions) -> TallyResult<ImportSummary> {
        if !path.exists() {
            return Err(TallyError::Import(format!(
                "File '{}' not found",
                path.display()
            )));
        }

        let file = std::fs::File::open(path)
            .map_err(|e| TallyError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
        let batch = self.normalizer.parse_reader(file)?;

        let summary = self.import_batch(batch, options)?;
        info!(
            file = %path.display(),
            imported = summary.imported_count(),
            skipped = summary.skipped_duplicates,
            errors = summary.error_count(),
            "import finished"
        );
        Ok(summary)
    }

    /// Dedupe, categorize and persist an already-normalized batch
    pub fn import_batch(
        &self,
        batch: ImportBatch,
        options: ImportOptions,
    ) -> TallyResult<ImportSummary> {
        let mut summary = ImportSummary {
            found: batch.transactions.len(),
            warnings: batch.warnings,
            ..Default::default()
        };

        let mut ledger = if options.skip_duplicates {
            self.storage.transactions.get_all()?
        } else {
            Vec::new()
        };

        for mut txn in batch.transactions {
            if options.skip_duplicates {
                if duplicate::is_duplicate(&txn, &ledger) {
                    summary.skipped_duplicates += 1;
                    continue;
                }
                ledger.push(txn.clone());
            }

            if options.auto_categorize && txn.is_uncategorized() {
                if let Some(rule) = self.engine.find_match(&txn.description) {
                    txn.category = rule.category.clone();
                    summary.auto_categorized += 1;
                }
            }

            summary.imported.push(txn);
        }

        if summary.imported.is_empty() {
            return Ok(summary);
        }

        self.storage
            .transactions
            .create_many(summary.imported.clone())?;
        self.storage.transactions.save()?;

        let entries: Vec<_> = summary
            .imported
            .iter()
            .map(|txn| {
                AuditEntry::create(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(txn.description.clone()),
                    txn,
                )
            })
            .collect();
        self.storage.log_batch(&entries)?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::DateRange;
    use crate::services::budget::spending;
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

    #[test]
    fn test_detect_columns() {
        let columns =
            ColumnMap::detect(["Transaction Date", "Merchant", "Amount", "Category"]).unwrap();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.description, 1);
        assert_eq!(columns.amount, 2);
        assert_eq!(columns.category, Some(3));
        assert_eq!(columns.kind, None);
    }

    #[test]
    fn test_detect_type_column() {
        let columns = ColumnMap::detect(["Posted", "Payee", "Debit", "Type"]).unwrap();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.description, 1);
        assert_eq!(columns.amount, 2);
        assert_eq!(columns.kind, Some(3));
        // "type" also counts as a category-like label
        assert_eq!(columns.category, Some(3));
    }

    #[test]
    fn test_detect_category_first_match_wins() {
        let columns =
            ColumnMap::detect(["Date", "Category", "Description", "Amount", "Subcategory"])
                .unwrap();
        assert_eq!(columns.category, Some(1));
    }

    #[test]
    fn test_detect_last_match_wins_for_required_roles() {
        let columns =
            ColumnMap::detect(["Date", "Value Date", "Memo", "Description", "Amount"]).unwrap();
        assert_eq!(columns.date, 1);
        assert_eq!(columns.description, 3);
    }

    #[test]
    fn test_missing_required_columns() {
        let err = ColumnMap::detect(["When", "Description", "Amount"]).unwrap_err();
        match err {
            TallyError::MissingRequiredColumns { missing } => assert_eq!(missing, vec!["date"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-12-15"), Some(date(2025, 12, 15)));
        assert_eq!(parse_date("15/12/2025"), Some(date(2025, 12, 15)));
        assert_eq!(parse_date("12/25/2025"), Some(date(2025, 12, 25)));
        assert_eq!(parse_date("2025/12/15"), Some(date(2025, 12, 15)));
        assert_eq!(parse_date("Dec 15, 2025"), Some(date(2025, 12, 15)));
        assert_eq!(parse_date("15-Dec-2025"), Some(date(2025, 12, 15)));
        assert_eq!(parse_date("2025-12-15 08:30:00"), Some(date(2025, 12, 15)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_ambiguous_date_prefers_day_first() {
        assert_eq!(parse_date("03/04/2025"), Some(date(2025, 4, 3)));
    }

    #[test]
    fn test_parse_amount_notations() {
        assert_eq!(
            parse_amount("-$1,234.56").unwrap(),
            (Money::from_cents(123456), TransactionType::Expense)
        );
        assert_eq!(
            parse_amount("+250.00").unwrap(),
            (Money::from_cents(25000), TransactionType::Income)
        );
        assert_eq!(
            parse_amount("(75.00)").unwrap(),
            (Money::from_cents(7500), TransactionType::Expense)
        );
        assert_eq!(
            parse_amount("+(75.00)").unwrap(),
            (Money::from_cents(7500), TransactionType::Expense)
        );
        assert_eq!(
            parse_amount("100.00 CR").unwrap(),
            (Money::from_cents(10000), TransactionType::Income)
        );
        assert_eq!(
            parse_amount("£42.10Dr").unwrap(),
            (Money::from_cents(4210), TransactionType::Expense)
        );
        assert_eq!(
            parse_amount("€ 9.99").unwrap(),
            (Money::from_cents(999), TransactionType::Expense)
        );
        assert!(parse_amount("n/a").is_err());
    }

    #[test]
    fn test_type_column_overrides_sign() {
        let csv = "Date,Description,Amount,Type\n\
                   2025-12-01,Refund,-20.00,credit\n\
                   2025-12-02,Card,+15.00,withdrawal\n\
                   2025-12-03,Other,+5.00,pending\n";
        let batch = CsvNormalizer::new().parse_str(csv).unwrap();

        let kinds: Vec<_> = batch.transactions.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionType::Income,
                TransactionType::Expense,
                TransactionType::Income
            ]
        );
    }

    #[test]
    fn test_defaults_for_empty_fields() {
        let csv = "Date,Description,Amount,Category\n2025-12-01,,12.00,\n";
        let batch = CsvNormalizer::new().parse_str(csv).unwrap();

        let txn = &batch.transactions[0];
        assert_eq!(txn.description, DEFAULT_DESCRIPTION);
        assert_eq!(txn.category, UNCATEGORIZED);
        assert_eq!(txn.kind, TransactionType::Expense);
    }

    #[test]
    fn test_bad_row_is_skipped_with_warning() {
        let csv = "Date,Description,Amount\n\
                   2025-12-01,One,10.00\n\
                   2025-12-02,Two,20.00\n\
                   not-a-date,Three,30.00\n\
                   2025-12-04,Four,40.00\n\
                   2025-12-05,Five,50.00\n";
        let batch = CsvNormalizer::new().parse_str(csv).unwrap();

        assert_eq!(batch.transactions.len(), 4);
        assert_eq!(batch.warnings.len(), 1);
        assert_eq!(batch.warnings[0].row, 3);
        assert!(batch.warnings[0].message.contains("not-a-date"));
    }

    #[test]
    fn test_oversized_amounts_are_row_warnings() {
        let csv = "Date,Description,Amount\n\
                   2025-12-01,A,90000000000000000\n\
                   2025-12-02,B,90000000000000000\n\
                   2025-12-03,C,12.00\n";
        let batch = CsvNormalizer::new().parse_str(csv).unwrap();

        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.warnings.len(), 2);
        assert!(batch.warnings[0].message.contains("too large"));

        let range = DateRange::month_containing(date(2025, 12, 1));
        let spent = spending(&batch.transactions, UNCATEGORIZED, &range);
        assert_eq!(spent, Money::from_cents(1200));
    }

    #[test]
    fn test_short_row_is_skipped_with_warning() {
        let csv = "Date,Description,Amount\n2025-12-01,One\n2025-12-02,Two,5\n";
        let batch = CsvNormalizer::new().parse_str(csv).unwrap();

        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.warnings[0].row, 1);
        assert!(batch.warnings[0].message.contains("missing amount"));
    }

    #[test]
    fn test_missing_date_column_fails_whole_file() {
        let csv = "When,Description,Amount\n2025-12-01,One,10.00\n";
        let err = CsvNormalizer::new().parse_str(csv).unwrap_err();
        assert!(matches!(err, TallyError::MissingRequiredColumns { .. }));
    }

    #[test]
    fn test_import_with_dedupe_and_categorize() {
        let (temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::with_default_rules();

        storage
            .transactions
            .create(Transaction::new(
                date(2025, 12, 1),
                "Starbucks",
                Money::from_cents(450),
                "Restaurants",
                TransactionType::Expense,
            ))
            .unwrap();

        let path = temp_dir.path().join("statement.csv");
        std::fs::write(
            &path,
            "Date,Description,Amount\n\
             2025-12-01,Starbucks,-4.50\n\
             2025-12-02,Whole Foods,-80.00\n\
             2025-12-02,Whole Foods,-80.00\n\
             2025-12-03,Mystery Vendor,-12.00\n\
             bad,Row,1\n",
        )
        .unwrap();

        let service = ImportService::new(&storage, &engine);
        let summary = service
            .import_file(
                &path,
                ImportOptions {
                    auto_categorize: true,
                    skip_duplicates: true,
                },
            )
            .unwrap();

        assert_eq!(summary.found, 4);
        assert_eq!(summary.imported_count(), 2);
        assert_eq!(summary.skipped_duplicates, 2);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.auto_categorized, 1);
        assert_eq!(summary.categorized_count(), 1);
        assert_eq!(summary.imported[0].category, "Groceries");
        assert_eq!(storage.transactions.count().unwrap(), 3);
        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_import_without_options_keeps_everything() {
        let (_temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::with_default_rules();
        let batch = CsvNormalizer::new()
            .parse_str("Date,Description,Amount\n2025-12-02,Whole Foods,-80\n2025-12-02,Whole Foods,-80\n")
            .unwrap();

        let summary = ImportService::new(&storage, &engine)
            .import_batch(batch, ImportOptions::default())
            .unwrap();

        assert_eq!(summary.imported_count(), 2);
        assert_eq!(summary.imported[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_failed_save_aborts_import() {
        let (temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::new();

        // A non-empty directory where the ledger file belongs cannot be replaced
        let ledger_path = TallyPaths::with_base_dir(temp_dir.path().to_path_buf())
            .transactions_file();
        std::fs::create_dir_all(ledger_path.join("blocked")).unwrap();

        let batch = CsvNormalizer::new()
            .parse_str("Date,Description,Amount\n2025-12-02,Whole Foods,-80\n")
            .unwrap();
        let err = ImportService::new(&storage, &engine)
            .import_batch(batch, ImportOptions::default())
            .unwrap_err();

        assert!(matches!(err, TallyError::Storage(_)));
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_import_missing_file() {
        let (temp_dir, storage) = create_test_storage();
        let engine = RuleEngine::new();
        let err = ImportService::new(&storage, &engine)
            .import_file(&temp_dir.path().join("nope.csv"), ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, TallyError::Import(_)));
    }
}
