//! Transaction display formatting

use crate::config::Settings;
use crate::models::Transaction;

use super::report::{separator, truncate};

const TABLE_WIDTH: usize = 90;

/// Format a single transaction as a table row
pub fn format_transaction_row(txn: &Transaction, settings: &Settings) -> String {
    format!(
        "{:<13} {:<12} {:<8} {:<25} {:<15} {:>12}",
        txn.id.to_string(),
        settings.format_date(txn.date),
        txn.kind.title(),
        truncate(&txn.description, 25),
        truncate(&txn.category, 15),
        settings.format_money(txn.amount)
    )
}

/// Format transactions as a table
pub fn format_transaction_table(transactions: &[Transaction], settings: &Settings) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&separator(TABLE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<13} {:<12} {:<8} {:<25} {:<15} {:>12}\n",
        "ID", "Date", "Type", "Description", "Category", "Amount"
    ));
    output.push_str(&separator(TABLE_WIDTH));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, settings));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("  ID:          {}\n", txn.id));
    output.push_str(&format!("  Type:        {}\n", txn.kind.title()));
    output.push_str(&format!("  Description: {}\n", txn.description));
    output.push_str(&format!("  Amount:      {}\n", settings.format_money(txn.amount)));
    output.push_str(&format!("  Category:    {}\n", txn.category));
    output.push_str(&format!("  Date:        {}\n", settings.format_date(txn.date)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionType};
    use chrono::NaiveDate;

    fn sample() -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            "A rather long description that will not fit",
            Money::from_cents(123456),
            "Groceries",
            TransactionType::Expense,
        )
    }

    #[test]
    fn test_table_row() {
        let row = format_transaction_row(&sample(), &Settings::default());
        assert!(row.starts_with("txn-"));
        assert!(row.contains("15/12/2025"));
        assert!(row.contains("Expense"));
        assert!(row.contains("A rather long descript..."));
        assert!(row.ends_with("$1234.56"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_transaction_table(&[], &Settings::default()),
            "No transactions found.\n"
        );
    }

    #[test]
    fn test_details() {
        let details = format_transaction_details(&sample(), &Settings::default());
        assert!(details.contains("Category:    Groceries"));
        assert!(details.contains("Date:        15/12/2025"));
    }
}
