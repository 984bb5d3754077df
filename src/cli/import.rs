//! CLI command handler for CSV import

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::TallyResult;
use crate::services::{ImportOptions, ImportService, RuleEngine};
use crate::storage::Storage;

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the CSV file
    pub file: PathBuf,
    /// Categorize uncategorized rows with the rules
    #[arg(long)]
    pub auto_categorize: bool,
    /// Skip rows that duplicate an existing transaction
    #[arg(long)]
    pub skip_duplicates: bool,
}

/// Handle `import`
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    engine: &RuleEngine,
    args: ImportArgs,
) -> TallyResult<()> {
    let options = ImportOptions {
        auto_categorize: args.auto_categorize || settings.import_auto_categorize,
        skip_duplicates: args.skip_duplicates || settings.import_skip_duplicates,
    };

    println!("Importing transactions from {}...", args.file.display());
    println!();

    let summary = ImportService::new(storage, engine).import_file(&args.file, options)?;

    for warning in &summary.warnings {
        println!("Warning: row {}: {}", warning.row, warning.message);
    }

    if summary.found == 0 {
        println!("No transactions found in file");
        return Ok(());
    }

    println!("Found {} transactions", summary.found);
    println!();
    println!("Import complete!");
    println!("  Imported:              {}", summary.imported_count());
    if options.skip_duplicates {
        println!("  Skipped (duplicates):  {}", summary.skipped_duplicates);
    }
    if summary.error_count() > 0 {
        println!("  Errors:                {}", summary.error_count());
    }
    if options.auto_categorize {
        println!(
            "  Auto-categorized:      {}/{}",
            summary.categorized_count(),
            summary.imported_count()
        );
    }

    Ok(())
}
