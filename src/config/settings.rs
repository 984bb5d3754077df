//! User settings for Tally
//!
//! Display preferences, the budget warning threshold and import defaults.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;

/// User settings for Tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format (strftime) for display and date arguments
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Percent of a budget at which spending is flagged as a warning
    #[serde(default = "default_warning_percent")]
    pub budget_warning_percent: f64,

    /// Default number of rows shown by `list`
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Run imported rows through the categorization rules by default
    #[serde(default)]
    pub import_auto_categorize: bool,

    /// Skip duplicate rows on import by default
    #[serde(default)]
    pub import_skip_duplicates: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_warning_percent() -> f64 {
    80.0
}

fn default_list_limit() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            budget_warning_percent: default_warning_percent(),
            list_limit: default_list_limit(),
            import_auto_categorize: false,
            import_skip_duplicates: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TallyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: crate::models::Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format a date with the configured date format
    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// Parse a user-supplied date with the configured date format
    pub fn parse_date(&self, s: &str) -> Result<chrono::NaiveDate, TallyError> {
        chrono::NaiveDate::parse_from_str(s.trim(), &self.date_format).map_err(|_| {
            TallyError::Validation(format!(
                "Invalid date '{}'. Expected format {}",
                s,
                self.date_format.replace("%d", "DD").replace("%m", "MM").replace("%Y", "YYYY")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert_eq!(settings.budget_warning_percent, 80.0);
        assert_eq!(settings.list_limit, 20);
        assert!(!settings.import_auto_categorize);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.budget_warning_percent = 90.0;
        settings.import_skip_duplicates = true;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.budget_warning_percent, 90.0);
        assert!(loaded.import_skip_duplicates);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"currency_symbol":"€"}"#).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.list_limit, 20);
    }

    #[test]
    fn test_parse_and_format_date() {
        let settings = Settings::default();
        let date = settings.parse_date("15/12/2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 15).unwrap());
        assert_eq!(settings.format_date(date), "15/12/2025");

        let err = settings.parse_date("2025-12-15").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("DD/MM/YYYY"));
    }
}
