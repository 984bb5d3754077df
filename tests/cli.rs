use std::fs;
use std::path::Path;

use assert_cmd::Command;
use chrono::{Datelike, Local, NaiveDate};
use predicates::prelude::*;
use tempfile::TempDir;

fn tally(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", dir.path()).env_remove("TALLY_LOG");
    cmd
}

/// First and last day of the current month as DD/MM/YYYY
fn this_month() -> (String, String) {
    let today = Local::now().date_naive();
    let start = today.with_day(1).unwrap();
    let next = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1).unwrap()
    };
    let end = next.pred_opt().unwrap();
    (
        start.format("%d/%m/%Y").to_string(),
        end.format("%d/%m/%Y").to_string(),
    )
}

fn stored_transactions(dir: &Path) -> Vec<serde_json::Value> {
    let Ok(raw) = fs::read_to_string(dir.join("data").join("transactions.json")) else {
        return Vec::new();
    };
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json["transactions"].as_array().cloned().unwrap_or_default()
}

#[test]
fn add_auto_categorizes_and_lists() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Whole Foods Market", "--amount", "75.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-categorized as: Groceries"))
        .stdout(predicate::str::contains("Transaction added successfully!"));

    tally(&dir)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Whole Foods Market"))
        .stdout(predicate::str::contains("$75.50"));

    tally(&dir)
        .args(["list", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn add_rejects_bad_amount() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Coffee", "--amount", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount format"));

    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Coffee", "--amount", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));

    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Yacht", "--amount", "90000000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount too large"));

    assert!(stored_transactions(dir.path()).is_empty());
}

#[test]
fn explicit_category_is_kept() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args([
            "add", "--type", "expense", "--desc", "Starbucks", "--amount", "5", "--category",
            "Treats",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-categorized").not());

    let stored = stored_transactions(dir.path());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["category"], "Treats");
}

#[test]
fn search_matches_description_and_category() {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Uber ride", "--amount", "12"])
        .assert()
        .success();
    tally(&dir)
        .args(["add", "--type", "income", "--desc", "Paycheck", "--amount", "3000", "--category", "Salary"])
        .assert()
        .success();

    tally(&dir)
        .args(["search", "TRANSPORT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uber ride"))
        .stdout(predicate::str::contains("Paycheck").not());

    tally(&dir)
        .args(["search", "nothing-like-this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found matching"));
}

#[test]
fn delete_removes_transaction() {
    let dir = TempDir::new().unwrap();
    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Netflix", "--amount", "15.99"])
        .assert()
        .success();

    let stored = stored_transactions(dir.path());
    let id = stored[0]["id"].as_str().unwrap().to_string();

    tally(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted transaction"));
    assert!(stored_transactions(dir.path()).is_empty());

    tally(&dir).args(["delete", &id]).assert().failure();
}

#[test]
fn budget_warns_when_exceeded() {
    let dir = TempDir::new().unwrap();
    let (start, end) = this_month();

    tally(&dir)
        .args(["budget", "set", "Groceries", "100", &start, &end])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget set successfully!"));

    tally(&dir)
        .args(["budget", "set", "Groceries", "120", &start, &end])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget updated successfully! (was $100.00)"));

    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "Kroger", "--amount", "130"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Over budget!"));

    tally(&dir)
        .args(["budget", "check", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget Status: Groceries"))
        .stdout(predicate::str::contains("Over budget by"));

    tally(&dir)
        .args(["budget", "check", "Rent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No budget set for category 'Rent'"));
}

#[test]
fn budget_rejects_reversed_range() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["budget", "set", "Rent", "1200", "31/01/2025", "01/01/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("before start date"));
}

#[test]
fn import_with_flags_reports_counts() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("bank.csv");
    fs::write(
        &csv,
        "Date,Description,Amount\n\
         2025-12-01,Whole Foods Market,-80.00\n\
         2025-12-01,Whole Foods Market,-80.00\n\
         2025-12-02,Payroll Deposit,2500.00\n\
         not-a-date,Broken Row,-1.00\n",
    )
    .unwrap();

    tally(&dir)
        .args(["import"])
        .arg(&csv)
        .args(["--auto-categorize", "--skip-duplicates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 transactions"))
        .stdout(predicate::str::contains("Warning: row 4"))
        .stdout(predicate::str::contains("Skipped (duplicates):  1"))
        .stdout(predicate::str::contains("Imported:              2"));

    assert_eq!(stored_transactions(dir.path()).len(), 2);

    // Same file again: everything is now a duplicate
    tally(&dir)
        .args(["import"])
        .arg(&csv)
        .arg("--skip-duplicates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported:              0"));
}

#[test]
fn import_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["import", "does-not-exist.csv"])
        .assert()
        .failure();
}

#[test]
fn report_breaks_down_by_category() {
    let dir = TempDir::new().unwrap();
    for (desc, amount) in [("Whole Foods", "60"), ("Shell Gas", "40")] {
        tally(&dir)
            .args(["add", "--type", "expense", "--desc", desc, "--amount", amount])
            .assert()
            .success();
    }

    tally(&dir)
        .args(["report", "expense", "--period", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Expense: $100.00"))
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Transportation"))
        .stdout(predicate::str::contains("60.0%"));

    tally(&dir)
        .args(["report", "income", "--period", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No income transactions found for this period."));
}

#[test]
fn custom_rules_take_part_in_categorization() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["rules", "add", "Pets", "petco|chewy", "--priority", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule added"));

    tally(&dir)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pets"));

    tally(&dir)
        .args(["add", "--type", "expense", "--desc", "PETCO #123", "--amount", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-categorized as: Pets"));

    tally(&dir)
        .args(["rules", "add", "Broken", "(unclosed"])
        .assert()
        .failure();
}

#[test]
fn rules_test_reports_match() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["rules", "test", "uber|lyft", "UBER TRIP 42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Match:"));

    tally(&dir)
        .args(["rules", "test", "uber|lyft", "Metro card"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No match:"));
}

#[test]
fn init_and_config_show_paths() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    assert!(dir.path().join("config.json").exists());

    tally(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Date format:            %d/%m/%Y"));
}
