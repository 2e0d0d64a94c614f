//! Monthly budget records and results
//!
//! `MonthlyBudgetRecord` is the per-category allocation the user typed into
//! the grid. `MonthlyBudgetResult` is what the budget-math library reports
//! back for one month.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, MasterCategoryId};
use super::money::Money;
use super::month::MonthKey;

/// Policy for a category that went negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverspendingHandling {
    /// Deficit rolls into next month's same category
    Confined,
    /// Deficit is absorbed by next month's available-to-budget
    AffectsBuffer,
}

impl fmt::Display for OverspendingHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confined => write!(f, "Confined"),
            Self::AffectsBuffer => write!(f, "AffectsBuffer"),
        }
    }
}

/// Amount budgeted to a category in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudgetRecord {
    pub month: MonthKey,
    pub category_id: CategoryId,
    pub budgeted: Money,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub overspending_handling: Option<OverspendingHandling>,
}

impl MonthlyBudgetRecord {
    pub fn new(month: MonthKey, category_id: impl Into<CategoryId>, budgeted: impl Into<Money>) -> Self {
        Self {
            month,
            category_id: category_id.into(),
            budgeted: budgeted.into(),
            note: None,
            overspending_handling: None,
        }
    }
}

/// Budget-math output for one category in one month
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMonthResult {
    pub category_id: CategoryId,
    pub budgeted: Money,
    pub activity: Money,
    pub available: Money,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub overspending_handling: Option<OverspendingHandling>,
}

impl CategoryMonthResult {
    pub fn new(
        category_id: impl Into<CategoryId>,
        budgeted: impl Into<Money>,
        activity: impl Into<Money>,
        available: impl Into<Money>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            budgeted: budgeted.into(),
            activity: activity.into(),
            available: available.into(),
            note: None,
            overspending_handling: None,
        }
    }

    /// Any of budgeted/activity/available is non-zero within the epsilon
    pub fn has_values(&self) -> bool {
        self.budgeted.is_nonzero() || self.activity.is_nonzero() || self.available.is_nonzero()
    }

    pub fn values(&self) -> MonthValues {
        MonthValues {
            budgeted: self.budgeted,
            activity: self.activity,
            available: self.available,
        }
    }
}

/// Budget-math output for one master category in one month
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterMonthResult {
    pub master_category_id: MasterCategoryId,
    pub budgeted: Money,
    pub activity: Money,
    pub available: Money,
    #[serde(default)]
    pub categories: Vec<CategoryMonthResult>,
}

impl MasterMonthResult {
    /// Build a master row whose totals are the sums of its categories
    pub fn from_categories(
        master_category_id: impl Into<MasterCategoryId>,
        categories: Vec<CategoryMonthResult>,
    ) -> Self {
        Self {
            master_category_id: master_category_id.into(),
            budgeted: categories.iter().map(|c| c.budgeted).sum(),
            activity: categories.iter().map(|c| c.activity).sum(),
            available: categories.iter().map(|c| c.available).sum(),
            categories,
        }
    }

    pub fn values(&self) -> MonthValues {
        MonthValues {
            budgeted: self.budgeted,
            activity: self.activity,
            available: self.available,
        }
    }
}

/// Everything the budget-math library reports for one month
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudgetResult {
    pub income: Money,
    #[serde(default)]
    pub deferred_income: Money,
    #[serde(default)]
    pub from_last_month: Money,
    #[serde(default)]
    pub last_month_overspent: Money,
    pub total_budgeted: Money,
    pub total_activity: Money,
    #[serde(default)]
    pub total_carryover: Money,
    pub available_to_budget: Money,
    #[serde(default)]
    pub master_categories: Vec<MasterMonthResult>,
}

impl MonthlyBudgetResult {
    /// The all-zero result substituted when a month fails to aggregate
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Find one category's figures
    pub fn category(&self, category_id: &str) -> Option<&CategoryMonthResult> {
        self.categories().find(|c| c.category_id.as_str() == category_id)
    }

    /// Find one master category's figures
    pub fn master(&self, master_id: &str) -> Option<&MasterMonthResult> {
        self.master_categories
            .iter()
            .find(|m| m.master_category_id.as_str() == master_id)
    }

    /// Iterate every category across all masters
    pub fn categories(&self) -> impl Iterator<Item = &CategoryMonthResult> {
        self.master_categories.iter().flat_map(|m| m.categories.iter())
    }
}

/// The three figures every grid cell shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthValues {
    pub budgeted: Money,
    pub activity: Money,
    pub available: Money,
}

impl MonthValues {
    /// Income rows only ever carry activity
    pub fn activity_only(activity: Money) -> Self {
        Self {
            budgeted: Money::zero(),
            activity,
            available: Money::zero(),
        }
    }

    /// Available is below zero by more than the epsilon
    pub fn is_overspent(&self) -> bool {
        self.available.is_negative() && self.available.is_nonzero()
    }
}
