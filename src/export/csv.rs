//! CSV Export functionality
//!
//! Exports the classification report and the account register to CSV format.

use std::io::Write;

use crate::error::{GridError, GridResult};
use crate::reports::{AccountRegister, ClassificationReport};

/// Export the classification report, one row per line of the tree
pub fn export_classification_csv<W: Write>(
    report: &ClassificationReport,
    writer: W,
) -> GridResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(report.header())?;
    for row in report.to_rows() {
        csv_writer.write_record(&row)?;
    }

    csv_writer
        .flush()
        .map_err(|e| GridError::Export(e.to_string()))
}

/// Export register entries in display order
pub fn export_register_csv<W: Write>(register: &AccountRegister, writer: W) -> GridResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "ID",
        "Date",
        "Account",
        "Payee",
        "Category",
        "Memo",
        "Amount",
        "Balance",
        "Status",
        "Flag",
        "Is Split",
        "Is Transfer",
    ])?;

    for entry in &register.entries {
        let balance = if register.has_balances() {
            entry.running_balance.to_plain_string()
        } else {
            String::new()
        };

        csv_writer.write_record([
            entry.transaction_id.to_string(),
            entry.date.to_string(),
            entry.account_name.clone(),
            entry.payee.clone(),
            entry.category.clone(),
            entry.memo.clone(),
            entry.amount.to_plain_string(),
            balance,
            entry.cleared.to_string(),
            entry.flag.clone().unwrap_or_default(),
            entry.is_split.to_string(),
            entry.is_transfer.to_string(),
        ])?;
    }

    csv_writer
        .flush()
        .map_err(|e| GridError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Category, ClearedStatus, MasterCategory, Transaction};
    use crate::reports::{RegisterFilter, RegisterScope, SortDirection};
    use crate::services::income::IMMEDIATE_INCOME_CATEGORY_ID;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn transactions() -> Vec<Transaction> {
        let mut cleared = Transaction::new("t1", "Account/1", date("2024-06-03"), -50.0)
            .with_category("Category/A")
            .with_payee("Grocer, Inc.");
        cleared.cleared = ClearedStatus::Cleared;

        vec![
            cleared,
            Transaction::new("t2", "Account/1", date("2024-06-01"), 1000.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID)
                .with_payee("Acme"),
        ]
    }

    #[test]
    fn test_classification_csv() {
        let report = ClassificationReport::generate(
            &transactions(),
            &[Category::new("Category/A", "Groceries", "MasterCategory/1")],
            &[MasterCategory::new("MasterCategory/1", "Everyday")],
            date("2024-06-01"),
            date("2024-06-30"),
            &[],
        );

        let mut buffer = Vec::new();
        export_classification_csv(&report, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Classification,Master Category,Category,2024-06,Total");
        assert!(lines.contains(&"Income,,Acme,1000.00,1000.00"));
        assert!(lines.contains(&"Expenses,Everyday,Groceries,50.00,50.00"));
        assert_eq!(lines.last().copied(), Some("Net,,,950.00,950.00"));
    }

    #[test]
    fn test_register_csv_quotes_fields() {
        let register = AccountRegister::generate(
            &transactions(),
            &RegisterScope::Account("Account/1".into()),
            SortDirection::Asc,
            &[Account::new("Account/1", "Checking")],
            &[Category::new("Category/A", "Groceries", "MasterCategory/1")],
            &RegisterFilter::default(),
        )
        .unwrap();

        let mut buffer = Vec::new();
        export_register_csv(&register, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID,Date,Account,Payee"));
        assert!(lines[1].starts_with("t2,2024-06-01,Checking,Acme"));
        assert!(lines[2].contains("\"Grocer, Inc.\""));
        assert!(lines[2].contains("-50.00,950.00,Cleared"));
    }
}
