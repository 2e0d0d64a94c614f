//! Grid selection state
//!
//! A selection is transient UI state: the cell the user clicked, which drives
//! the transaction side panel. The absence of a selection is `Option::None`.

use serde::{Deserialize, Serialize};

use super::month::MonthKey;

/// Id of the synthetic income master category
pub const INCOME_MASTER_ID: &str = "__income__";

/// Prefix of synthetic per-payee income categories
pub const INCOME_CATEGORY_PREFIX: &str = "income_";

/// A selected grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    /// A single (real or income pseudo) category in one month
    Category {
        id: String,
        month: MonthKey,
        name: String,
    },
    /// A master category (or the income master) in one month
    Master {
        id: String,
        month: MonthKey,
        name: String,
    },
}

impl Selection {
    pub fn category(id: impl Into<String>, month: MonthKey, name: impl Into<String>) -> Self {
        Self::Category {
            id: id.into(),
            month,
            name: name.into(),
        }
    }

    pub fn master(id: impl Into<String>, month: MonthKey, name: impl Into<String>) -> Self {
        Self::Master {
            id: id.into(),
            month,
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Category { id, .. } | Self::Master { id, .. } => id,
        }
    }

    pub fn month(&self) -> MonthKey {
        match self {
            Self::Category { month, .. } | Self::Master { month, .. } => *month,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Category { name, .. } | Self::Master { name, .. } => name,
        }
    }

    pub fn is_master(&self) -> bool {
        matches!(self, Self::Master { .. })
    }

    /// Selection of the income master or one of its payee rows
    pub fn is_income(&self) -> bool {
        let id = self.id();
        id == INCOME_MASTER_ID || id.starts_with(INCOME_CATEGORY_PREFIX)
    }

    /// Payee key of an income payee selection
    pub fn income_payee_key(&self) -> Option<&str> {
        self.id().strip_prefix(INCOME_CATEGORY_PREFIX)
    }
}
