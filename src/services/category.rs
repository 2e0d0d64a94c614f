//! Category structure builder
//!
//! Turns the flat category and master category lists into the nested,
//! ordered tree the budget grid renders, and works out which categories are
//! active within the visible months.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::models::{Category, CategoryId, MasterCategory, MonthlyBudgetResult};

/// A master category with its visible sub-categories, in display order
#[derive(Debug, Clone, Serialize)]
pub struct MasterCategoryNode {
    pub master: MasterCategory,
    pub categories: Vec<Category>,
}

impl MasterCategoryNode {
    pub fn category_ids(&self) -> impl Iterator<Item = &CategoryId> {
        self.categories.iter().map(|c| &c.entity_id)
    }
}

/// The ordered master/category tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryStructure {
    pub masters: Vec<MasterCategoryNode>,
}

impl CategoryStructure {
    /// Build the tree.
    ///
    /// Tombstoned and system-internal masters are dropped, tombstoned
    /// categories are dropped, and both levels are ordered by sortable index
    /// (ties keep input order). With `show_only_active`, categories outside
    /// `active` are removed along with masters left empty.
    pub fn build(
        categories: &[Category],
        master_categories: &[MasterCategory],
        active: &HashSet<CategoryId>,
        show_only_active: bool,
    ) -> Self {
        let mut masters: Vec<MasterCategoryNode> = master_categories
            .iter()
            .filter(|m| !m.is_tombstone && !m.is_system())
            .map(|m| MasterCategoryNode {
                master: m.clone(),
                categories: Vec::new(),
            })
            .collect();

        for category in categories.iter().filter(|c| !c.is_tombstone) {
            match masters
                .iter_mut()
                .find(|node| node.master.entity_id == category.master_category_id)
            {
                Some(node) => node.categories.push(category.clone()),
                None => debug!(
                    category = %category.entity_id,
                    master = %category.master_category_id,
                    "category has no displayable master"
                ),
            }
        }

        for node in &mut masters {
            node.categories
                .sort_by(|a, b| a.sortable_index.total_cmp(&b.sortable_index));
        }
        masters.sort_by(|a, b| a.master.sortable_index.total_cmp(&b.master.sortable_index));

        if show_only_active {
            for node in &mut masters {
                node.categories.retain(|c| active.contains(&c.entity_id));
            }
            masters.retain(|node| !node.categories.is_empty());
        }

        Self { masters }
    }

    pub fn is_empty(&self) -> bool {
        self.masters.is_empty()
    }

    pub fn master(&self, master_id: &str) -> Option<&MasterCategoryNode> {
        self.masters
            .iter()
            .find(|node| node.master.entity_id.as_str() == master_id)
    }

    /// Ids of the sub-categories shown under a master; empty when unknown
    pub fn subcategory_ids(&self, master_id: &str) -> HashSet<CategoryId> {
        self.master(master_id)
            .map(|node| node.category_ids().cloned().collect())
            .unwrap_or_default()
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.masters
            .iter()
            .flat_map(|node| node.categories.iter())
            .find(|c| c.entity_id.as_str() == category_id)
    }

    pub fn category_count(&self) -> usize {
        self.masters.iter().map(|node| node.categories.len()).sum()
    }
}

/// Categories with a non-zero budgeted, activity or available figure in any
/// of the given months
pub fn active_category_ids<'a, I>(results: I) -> HashSet<CategoryId>
where
    I: IntoIterator<Item = &'a MonthlyBudgetResult>,
{
    results
        .into_iter()
        .flat_map(|result| result.categories())
        .filter(|c| c.has_values())
        .map(|c| c.category_id.clone())
        .collect()
}
