//! Budget CLI commands
//!
//! Setting, listing, checking and deleting category budgets.

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_check, format_budget_list};
use crate::error::{TallyError, TallyResult};
use crate::models::DateRange;
use crate::services::{BudgetService, SetBudgetOutcome};
use crate::storage::Storage;

use super::transaction::parse_positive_amount;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// List all budgets
    List,

    /// Set a budget for a category over a date range
    Set {
        /// Category name
        category: String,
        /// Target amount (e.g., "500")
        amount: String,
        /// Start date (DD/MM/YYYY)
        start: String,
        /// End date (DD/MM/YYYY)
        end: String,
    },

    /// Check a category against its budget
    Check {
        /// Category name
        category: String,
        /// Treat the budget as an income goal
        #[arg(long)]
        income: bool,
    },

    /// Delete a budget
    Delete {
        /// Budget ID (as shown by `budget list`)
        id: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> TallyResult<()> {
    let service =
        BudgetService::new(storage).with_warning_percent(settings.budget_warning_percent);

    match cmd {
        BudgetCommands::List => {
            let budgets = service.list()?;
            if !budgets.is_empty() {
                println!("Budgets");
                println!("{}", "=".repeat(40));
            }
            print!("{}", format_budget_list(&budgets, settings));
        }

        BudgetCommands::Set {
            category,
            amount,
            start,
            end,
        } => {
            let amount = parse_positive_amount(&amount)?;
            let start = settings.parse_date(&start)?;
            let end = settings.parse_date(&end)?;
            let range =
                DateRange::new(start, end).map_err(|e| TallyError::Validation(e.to_string()))?;

            let outcome = service.set(&category, amount, range)?;
            match &outcome {
                SetBudgetOutcome::Created(_) => println!("Budget set successfully!"),
                SetBudgetOutcome::Updated { before, .. } => println!(
                    "Budget updated successfully! (was {})",
                    settings.format_money(before.amount)
                ),
            }

            let budget = outcome.budget();
            println!("  ID:       {}", budget.id);
            println!("  Category: {}", budget.category);
            println!("  Amount:   {}", settings.format_money(budget.amount));
            println!(
                "  Period:   {} to {}",
                settings.format_date(range.start),
                settings.format_date(range.end)
            );
        }

        BudgetCommands::Check { category, income } => {
            let today = Local::now().date_naive();
            let result = if income {
                service.check_income(&category, today)?
            } else {
                service.check(&category, today)?
            };

            match result {
                Some(result) => print!("{}", format_budget_check(&result, settings)),
                None => println!("No budget set for category '{}'", category),
            }
        }

        BudgetCommands::Delete { id } => {
            let budget = service.delete(&id)?;
            println!(
                "Deleted budget for '{}' ({})",
                budget.category,
                settings.format_money(budget.amount)
            );
        }
    }

    Ok(())
}
