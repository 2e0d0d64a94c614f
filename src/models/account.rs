//! Account model
//!
//! On-budget accounts count toward the budget; transfers between two of them
//! are internal movements and never show up as income or spending.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;

/// A financial account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(alias = "id")]
    pub entity_id: AccountId,

    #[serde(default, alias = "accountName")]
    pub name: String,

    /// Whether this account is included in the budget
    #[serde(default = "default_on_budget")]
    pub on_budget: bool,

    #[serde(default)]
    pub is_tombstone: bool,

    #[serde(default, alias = "hidden")]
    pub closed: bool,
}

fn default_on_budget() -> bool {
    true
}

impl Account {
    /// Create a new on-budget account
    pub fn new(entity_id: impl Into<AccountId>, name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: name.into(),
            on_budget: true,
            is_tombstone: false,
            closed: false,
        }
    }

    /// Create a tracking (off-budget) account
    pub fn off_budget(entity_id: impl Into<AccountId>, name: impl Into<String>) -> Self {
        let mut account = Self::new(entity_id, name);
        account.on_budget = false;
        account
    }

    /// The reduced view handed to the budget-math library
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            entity_id: self.entity_id.clone(),
            on_budget: self.on_budget,
            is_tombstone: self.is_tombstone,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Account metadata reduced to what budget math needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub entity_id: AccountId,
    pub on_budget: bool,
    pub is_tombstone: bool,
}
