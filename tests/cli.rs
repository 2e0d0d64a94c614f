use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "envelope-grid";

const BUDGET: &str = r#"{
  "accounts": [
    { "entityId": "Account/1", "name": "Checking", "onBudget": true }
  ],
  "masterCategories": [
    { "entityId": "MasterCategory/1", "name": "Everyday", "type": "OUTFLOW", "sortableIndex": 1 }
  ],
  "categories": [
    { "entityId": "Category/A", "name": "Groceries", "masterCategoryId": "MasterCategory/1" }
  ],
  "monthlyBudgets": [
    { "month": "2024-06", "categoryId": "Category/A", "budgeted": 300.0 }
  ],
  "transactions": [
    {
      "id": "t1", "date": "2024-06-02", "amount": -50.0, "accountId": "Account/1",
      "categoryId": "Category/A", "payee": "Grocer", "cleared": "Cleared"
    },
    {
      "id": "t2", "date": "2024-06-01", "amount": 1000.0, "accountId": "Account/1",
      "categoryId": "Category/__ImmediateIncome__", "payee": "Acme"
    }
  ]
}"#;

struct Fixture {
    dir: TempDir,
    budget: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("temp dir");
    let budget = dir.path().join("budget.json");
    std::fs::write(&budget, BUDGET).expect("write budget");
    Fixture { dir, budget }
}

fn command(fx: &Fixture) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("ENVELOPE_GRID_DIR", fx.dir.path().join("config"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn grid_prints_summary_and_rows() {
    let fx = fixture();
    command(&fx)
        .args(["grid", "--month", "2024-06", "--expand-all", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("Budget for 2024-06"))
        .stdout(contains("2024-05").and(contains("2024-07")))
        .stdout(contains("Groceries"))
        .stdout(contains("Acme"))
        .stdout(contains("$250.00"))
        .stdout(contains("$700.00"));
}

#[test]
fn grid_rejects_bad_month() {
    let fx = fixture();
    command(&fx)
        .args(["grid", "--month", "2024-13", "--budget"])
        .arg(&fx.budget)
        .assert()
        .failure()
        .stderr(contains("Invalid month"));
}

#[test]
fn register_shows_running_balance() {
    let fx = fixture();
    command(&fx)
        .args(["register", "--account", "checking", "--sort", "asc", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("Account Register: Checking"))
        .stdout(contains("Ending Balance: $950.00"));
}

#[test]
fn register_unknown_account_fails() {
    let fx = fixture();
    command(&fx)
        .args(["register", "--account", "Savings", "--budget"])
        .arg(&fx.budget)
        .assert()
        .failure()
        .stderr(contains("Account not found: Savings"));
}

#[test]
fn register_csv_to_stdout() {
    let fx = fixture();
    command(&fx)
        .args(["register", "--output", "csv", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("ID,Date,Account,Payee"))
        .stdout(contains("t1,2024-06-02,Checking,Grocer"));
}

#[test]
fn report_prints_and_exports() {
    let fx = fixture();
    command(&fx)
        .args(["report", "--start", "2024-06-01", "--end", "2024-06-30", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("Income & Expense Report"))
        .stdout(contains("Total Income"))
        .stdout(contains("Groceries"));

    let out = fx.dir.path().join("report.csv");
    command(&fx)
        .args(["report", "--start", "2024-06-01", "--end", "2024-06-30", "--budget"])
        .arg(&fx.budget)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Report exported to"));

    let csv = std::fs::read_to_string(&out).expect("report written");
    assert!(csv.starts_with("Classification,Master Category,Category,2024-06,Total"));
    assert!(csv.contains("Net,,,950.00,950.00"));
}

#[test]
fn report_rejects_reversed_range() {
    let fx = fixture();
    command(&fx)
        .args(["report", "--start", "2024-07-01", "--end", "2024-06-01", "--budget"])
        .arg(&fx.budget)
        .assert()
        .failure()
        .stderr(contains("is after end date"));
}

#[test]
fn transactions_for_category() {
    let fx = fixture();
    command(&fx)
        .args(["transactions", "--category", "Category/A", "--month", "2024-06", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("Groceries 2024-06"))
        .stdout(contains("Grocer"))
        .stdout(contains("Acme").not());
}

#[test]
fn transactions_for_income_master() {
    let fx = fixture();
    command(&fx)
        .args(["transactions", "--master", "__income__", "--month", "2024-06", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("Income 2024-06"))
        .stdout(contains("Acme"));
}

#[test]
fn config_shows_defaults_without_writing() {
    let fx = fixture();
    command(&fx)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Visible months:   3"))
        .stdout(contains("Register sort:    desc"));

    assert!(!fx.dir.path().join("config").join("settings.json").exists());
}

#[test]
fn missing_budget_file_fails() {
    let fx = fixture();
    command(&fx)
        .args(["grid", "--budget"])
        .arg(fx.dir.path().join("nope.json"))
        .assert()
        .failure();
}

#[test]
fn transactions_unknown_category_fails() {
    let fx = fixture();
    command(&fx)
        .args(["transactions", "--category", "Category/Missing", "--month", "2024-06", "--budget"])
        .arg(&fx.budget)
        .assert()
        .failure()
        .stderr(contains("Category not found: Category/Missing"));
}

#[test]
fn register_honours_date_format_setting() {
    let fx = fixture();
    let config_dir = fx.dir.path().join("config");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    std::fs::write(config_dir.join("settings.json"), r#"{"date_format": "%d/%m/%Y"}"#)
        .expect("write settings");

    command(&fx)
        .args(["register", "--account", "Checking", "--budget"])
        .arg(&fx.budget)
        .assert()
        .success()
        .stdout(contains("02/06/2024"))
        .stdout(contains("2024-06-02").not());
}
