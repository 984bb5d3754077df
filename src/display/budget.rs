//! Budget display formatting
//!
//! Tables for `budget list`, the status block for `budget check`, and the
//! one-line feedback shown after a transaction is recorded.

use crate::config::Settings;
use crate::models::{Budget, Money};
use crate::services::{BudgetCheck, BudgetImpact, BudgetStatus};

use super::report::{separator, truncate};

fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:.0}%", p),
        None => "n/a".to_string(),
    }
}

fn format_period(budget: &Budget, settings: &Settings) -> String {
    match &budget.period {
        Some(range) => range.format(&settings.date_format),
        None => "monthly".to_string(),
    }
}

/// Format budgets as a table
pub fn format_budget_list(budgets: &[Budget], settings: &Settings) -> String {
    if budgets.is_empty() {
        return "No budgets set.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<13} {:<20} {:>12}  {:<24}\n",
        "ID", "Category", "Amount", "Period"
    ));
    output.push_str(&separator(72));
    output.push('\n');

    for budget in budgets {
        output.push_str(&format!(
            "{:<13} {:<20} {:>12}  {:<24}\n",
            budget.id.to_string(),
            truncate(&budget.category, 20),
            settings.format_money(budget.amount),
            format_period(budget, settings)
        ));
    }

    output
}

/// Status block for one budget check
pub fn format_budget_check(result: &BudgetCheck, settings: &Settings) -> String {
    let mut output = String::new();
    let period = result.range.format(&settings.date_format);

    if result.is_income() {
        output.push_str(&format!("Income Goal: {}\n", result.category));
        output.push_str(&separator(37));
        output.push('\n');
        output.push_str(&format!("Target:     {}\n", settings.format_money(result.target)));
        output.push_str(&format!(
            "Received:   {} ({})\n",
            settings.format_money(result.used),
            format_percent(result.percent)
        ));
        output.push_str(&format!("Period:     {}\n\n", period));

        if result.status == BudgetStatus::TargetMet {
            output.push_str("Income goal met!\n");
        } else {
            output.push_str(&format!(
                "Still to go: {}\n",
                settings.format_money(result.remaining)
            ));
        }
        return output;
    }

    output.push_str(&format!("Budget Status: {}\n", result.category));
    output.push_str(&separator(37));
    output.push('\n');
    output.push_str(&format!("Budget:     {}\n", settings.format_money(result.target)));
    output.push_str(&format!(
        "Spent:      {} ({})\n",
        settings.format_money(result.used),
        format_percent(result.percent)
    ));
    output.push_str(&format!(
        "Remaining:  {}\n",
        settings.format_money(result.remaining)
    ));
    output.push_str(&format!("Period:     {}\n\n", period));

    match result.status {
        BudgetStatus::OverBudget => output.push_str(&format!(
            "Over budget by {}!\n",
            settings.format_money(result.overage())
        )),
        BudgetStatus::Warning => output.push_str(&format!(
            "Warning: {:.0}% or more of budget used\n",
            settings.budget_warning_percent
        )),
        _ => output.push_str("Within budget\n"),
    }

    output
}

fn ratio(used: Money, target: Money, percent: Option<f64>, settings: &Settings) -> String {
    format!(
        "{} / {} ({})",
        settings.format_money(used),
        settings.format_money(target),
        format_percent(percent)
    )
}

/// Warning line printed by `add` when an expense pushes a budget high
pub fn format_add_warning(impact: &BudgetImpact, settings: &Settings) -> Option<String> {
    let BudgetImpact::Checked(result) = impact else {
        return None;
    };
    let figures = ratio(result.used, result.target, result.percent, settings);

    match result.status {
        BudgetStatus::OverBudget => Some(format!("Over budget! Spent: {}", figures)),
        BudgetStatus::Warning => Some(format!("Budget warning: {}", figures)),
        _ => None,
    }
}

/// Status message describing how a new transaction affects its budget
pub fn budget_feedback(
    category: &str,
    impact: Option<&BudgetImpact>,
    settings: &Settings,
) -> String {
    let Some(impact) = impact else {
        return format!("No budget set for category '{}'", category);
    };

    match impact {
        BudgetImpact::OutOfPeriod { date, range } => format!(
            "Transaction date ({}) outside budget period ({} to {})",
            settings.format_date(*date),
            settings.format_date(range.start),
            settings.format_date(range.end)
        ),
        BudgetImpact::Checked(result) => {
            let figures = ratio(result.used, result.target, result.percent, settings);
            match result.status {
                BudgetStatus::OverBudget => format!("Over budget! Spent: {}", figures),
                BudgetStatus::Warning => format!("Budget warning: {}", figures),
                BudgetStatus::Ok => format!("Budget: {}", figures),
                BudgetStatus::InProgress => format!(
                    "Income: {} / {} target ({})",
                    settings.format_money(result.used),
                    settings.format_money(result.target),
                    format_percent(result.percent)
                ),
                BudgetStatus::TargetMet => format!("Income goal met! {}", figures),
            }
        }
    }
}
