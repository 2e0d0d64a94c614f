//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the grid and report layers.

pub mod config;
pub mod grid;
pub mod register;
pub mod report;
pub mod transactions;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{GridError, GridResult};
use crate::models::MonthKey;

pub use config::handle_config_command;
pub use grid::{handle_grid_command, GridArgs};
pub use register::{handle_register_command, RegisterArgs};
pub use report::{handle_report_command, ReportArgs};
pub use transactions::{handle_transactions_command, TransactionsArgs};

/// Parse a `YYYY-MM-DD` command-line date
pub(crate) fn parse_date(value: &str, what: &str) -> GridResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        GridError::Validation(format!("Invalid {} date format: {}. Use YYYY-MM-DD", what, value))
    })
}

/// Parse a `YYYY-MM` command-line month
pub(crate) fn parse_month(value: &str) -> GridResult<MonthKey> {
    MonthKey::parse(value).map_err(|e| {
        GridError::Validation(format!("Invalid month: {}. Use YYYY-MM (e.g., 2025-01)", e))
    })
}

/// Open an output file for writing
pub(crate) fn create_output(path: &Path) -> GridResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        GridError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-30", "end").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
        let err = parse_date("30/06/2024", "end").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Invalid end date format"));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-06").unwrap().to_string(), "2024-06");
        assert!(parse_month("2024-13").unwrap_err().is_validation());
    }
}
