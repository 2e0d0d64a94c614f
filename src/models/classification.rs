//! User-defined report classifications
//!
//! A classification is a labelled bucket of master categories ("Fixed
//! Costs", "Fun Money", ...) used to roll spending up one more level in
//! reports. Master categories not claimed by any classification land in an
//! implicit "Unclassified" bucket.

use serde::{Deserialize, Serialize};

use super::ids::MasterCategoryId;

/// A labelled group of master categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub label: String,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default)]
    pub master_category_ids: Vec<MasterCategoryId>,
}

impl Classification {
    pub fn new(label: impl Into<String>, sort_order: i32) -> Self {
        Self {
            label: label.into(),
            sort_order,
            master_category_ids: Vec::new(),
        }
    }

    pub fn with_masters<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<MasterCategoryId>,
    {
        self.master_category_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn contains(&self, master_id: &str) -> bool {
        self.master_category_ids.iter().any(|id| id.as_str() == master_id)
    }
}
