//! Budget snapshot
//!
//! The read-only input set for one render cycle, loaded from a JSON export
//! of a YNAB4 budget. Every array is optional in the file and defaults to
//! empty.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::models::{Account, Category, MasterCategory, MonthlyBudgetRecord, Transaction};

use super::file_io::read_json_required;

/// Transactions, budget records, categories and accounts of one budget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetSnapshot {
    pub transactions: Vec<Transaction>,
    pub monthly_budgets: Vec<MonthlyBudgetRecord>,
    pub categories: Vec<Category>,
    pub master_categories: Vec<MasterCategory>,
    pub accounts: Vec<Account>,
}

impl BudgetSnapshot {
    /// Load a snapshot from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        let path = path.as_ref();
        let snapshot: Self = read_json_required(path)?;
        debug!(
            path = %path.display(),
            transactions = snapshot.transactions.len(),
            categories = snapshot.categories.len(),
            accounts = snapshot.accounts.len(),
            "loaded budget snapshot"
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json_str(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.entity_id.as_str() == account_id)
    }

    pub fn account_name(&self, account_id: &str) -> Option<&str> {
        self.account(account_id).map(|a| a.name.as_str())
    }

    /// Find a live account by id or by case-insensitive name
    pub fn find_account(&self, name_or_id: &str) -> GridResult<&Account> {
        let live = || self.accounts.iter().filter(|a| !a.is_tombstone);

        live()
            .find(|a| a.entity_id.as_str() == name_or_id)
            .or_else(|| live().find(|a| a.name.eq_ignore_ascii_case(name_or_id)))
            .ok_or_else(|| GridError::account_not_found(name_or_id))
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.entity_id.as_str() == category_id)
    }

    pub fn master_category(&self, master_id: &str) -> Option<&MasterCategory> {
        self.master_categories
            .iter()
            .find(|m| m.entity_id.as_str() == master_id)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.monthly_budgets.is_empty()
            && self.categories.is_empty()
            && self.master_categories.is_empty()
            && self.accounts.is_empty()
    }
}
