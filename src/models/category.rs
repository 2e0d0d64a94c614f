//! Category and MasterCategory models
//!
//! Categories are organised under master categories. YNAB4 keeps a few
//! system-internal masters (hidden categories, internal bookkeeping,
//! pre-YNAB debt) that are never shown in the grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, MasterCategoryId};

/// Name prefixes of master categories the budget grid never displays
pub const HIDDEN_MASTER_PREFIXES: &[&str] = &["Hidden", "Internal"];

/// Name prefixes of master categories excluded from spending reports
pub const REPORT_EXCLUDED_MASTER_PREFIXES: &[&str] = &["Hidden", "Internal", "Pre-YNAB"];

/// A top-level grouping of budget categories (e.g. "Housing")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterCategory {
    pub entity_id: MasterCategoryId,

    pub name: String,

    /// YNAB4 master type (e.g. "OUTFLOW")
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub sortable_index: f64,

    #[serde(default)]
    pub is_tombstone: bool,
}

impl MasterCategory {
    pub fn new(entity_id: impl Into<MasterCategoryId>, name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: name.into(),
            kind: "OUTFLOW".to_string(),
            sortable_index: 0.0,
            is_tombstone: false,
        }
    }

    pub fn with_sort(mut self, sortable_index: f64) -> Self {
        self.sortable_index = sortable_index;
        self
    }

    /// System-internal grouping not meant for the grid
    pub fn is_system(&self) -> bool {
        has_prefix(&self.name, HIDDEN_MASTER_PREFIXES)
    }

    /// Grouping excluded from expense reports
    pub fn is_report_excluded(&self) -> bool {
        has_prefix(&self.name, REPORT_EXCLUDED_MASTER_PREFIXES)
    }
}

impl fmt::Display for MasterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A budget category within a master category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub entity_id: CategoryId,

    pub name: String,

    pub master_category_id: MasterCategoryId,

    #[serde(default)]
    pub sortable_index: f64,

    #[serde(default)]
    pub is_tombstone: bool,

    #[serde(default)]
    pub hidden: bool,
}

impl Category {
    pub fn new(
        entity_id: impl Into<CategoryId>,
        name: impl Into<String>,
        master_category_id: impl Into<MasterCategoryId>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: name.into(),
            master_category_id: master_category_id.into(),
            sortable_index: 0.0,
            is_tombstone: false,
            hidden: false,
        }
    }

    pub fn with_sort(mut self, sortable_index: f64) -> Self {
        self.sortable_index = sortable_index;
        self
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn has_prefix(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p))
}
