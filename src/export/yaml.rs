//! YAML Export functionality
//!
//! Human-readable report export with a short comment header.

use std::io::Write;

use serde::Serialize;

use crate::error::{GridError, GridResult};

/// Export a report as YAML, preceded by a comment naming it
pub fn export_yaml<T: Serialize, W: Write>(value: &T, title: &str, mut writer: W) -> GridResult<()> {
    writeln!(writer, "# envelope-grid {}", title).map_err(|e| GridError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M"))
        .map_err(|e| GridError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| GridError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, value).map_err(|e| GridError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Category, Transaction};
    use crate::reports::{AccountRegister, RegisterFilter, RegisterScope, SortDirection};
    use chrono::NaiveDate;

    #[test]
    fn test_register_to_yaml() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let register = AccountRegister::generate(
            &[Transaction::new("t1", "Account/1", d, -12.5).with_payee("Grocer")],
            &RegisterScope::All,
            SortDirection::Desc,
            &[Account::new("Account/1", "Checking")],
            &[] as &[Category],
            &RegisterFilter::default(),
        )
        .unwrap();

        let mut buffer = Vec::new();
        export_yaml(&register, "register", &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.starts_with("# envelope-grid register"));
        assert!(output.contains("title: All Accounts"));
        assert!(output.contains("payee: Grocer"));
    }
}
