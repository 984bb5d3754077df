//! Transaction CLI commands
//!
//! `add`, `list`, `search` and `delete`.

use chrono::Local;
use clap::Args;

use crate::config::Settings;
use crate::display::{format_add_warning, format_transaction_details, format_transaction_table};
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, TransactionType};
use crate::services::{NewTransaction, RuleEngine, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Arguments for `add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// income or expense
    #[arg(short = 't', long = "type")]
    pub kind: TransactionType,
    /// Description
    #[arg(short, long = "desc")]
    pub description: String,
    /// Amount (e.g., "75.50")
    #[arg(short, long)]
    pub amount: String,
    /// Category; auto-categorized from the description when omitted
    #[arg(short, long)]
    pub category: Option<String>,
    /// Transaction date (DD/MM/YYYY), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

/// Arguments for `list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by type: all, income or expense
    #[arg(short = 't', long = "type", default_value = "all")]
    pub kind: String,
    /// Number of transactions to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Parse a user-supplied amount, requiring it to be positive
pub fn parse_positive_amount(s: &str) -> TallyResult<Money> {
    let amount = Money::parse(s).map_err(|e| {
        TallyError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '75.50'. Error: {}",
            s, e
        ))
    })?;
    if !amount.is_positive() {
        return Err(TallyError::Validation(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// Handle `add`
pub fn handle_add_command(
    storage: &Storage,
    settings: &Settings,
    engine: &RuleEngine,
    args: AddArgs,
) -> TallyResult<()> {
    let amount = parse_positive_amount(&args.amount)?;
    let date = match &args.date {
        Some(d) => settings.parse_date(d)?,
        None => Local::now().date_naive(),
    };

    let service = TransactionService::new(storage, engine)
        .with_warning_percent(settings.budget_warning_percent);
    let outcome = service.add(NewTransaction {
        date,
        description: args.description,
        amount,
        category: args.category,
        kind: args.kind,
    })?;

    if outcome.auto_categorized {
        println!("Auto-categorized as: {}", outcome.transaction.category);
    }

    println!("Transaction added successfully!");
    print!("{}", format_transaction_details(&outcome.transaction, settings));

    if outcome.transaction.is_expense() {
        if let Some(line) = outcome
            .budget
            .as_ref()
            .and_then(|impact| format_add_warning(impact, settings))
        {
            println!();
            println!("{}", line);
        }
    }

    Ok(())
}

/// Handle `list`
pub fn handle_list_command(storage: &Storage, settings: &Settings, args: ListArgs) -> TallyResult<()> {
    let service = TransactionService::reader(storage);

    let mut filter = TransactionFilter::new().limit(args.limit.unwrap_or(settings.list_limit));
    match args.kind.trim().to_lowercase().as_str() {
        "all" => {}
        other => {
            let kind: TransactionType = other.parse().map_err(|_| {
                TallyError::Validation("--type must be 'all', 'income' or 'expense'".into())
            })?;
            filter = filter.kind(kind);
        }
    }

    let page = service.list(filter)?;
    if page.transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("Transactions ({} of {})", page.transactions.len(), page.total);
    print!("{}", format_transaction_table(&page.transactions, settings));

    if page.hidden() > 0 {
        println!();
        println!("... and {} more. Use --limit to see more.", page.hidden());
    }

    Ok(())
}

/// Handle `search`
pub fn handle_search_command(storage: &Storage, settings: &Settings, query: &str) -> TallyResult<()> {
    let results = TransactionService::reader(storage).search(query)?;

    if results.is_empty() {
        println!("No transactions found matching '{}'", query);
        return Ok(());
    }

    println!("Search Results for '{}' ({} found)", query, results.len());
    print!("{}", format_transaction_table(&results, settings));
    Ok(())
}

/// Handle `delete`
pub fn handle_delete_command(storage: &Storage, settings: &Settings, id: &str) -> TallyResult<()> {
    let txn = TransactionService::reader(storage).delete(id)?;

    println!("Deleted transaction {}", txn.id);
    print!("{}", format_transaction_details(&txn, settings));
    Ok(())
}
