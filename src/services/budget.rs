//! Monthly aggregation
//!
//! Runs the budget-math library once per visible month and caches the
//! results by month key. The cache is rebuilt wholesale on every pass and
//! swapped in as a whole; a failing month is replaced by an all-zero result
//! without affecting the others.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    Account, AccountSummary, Category, MasterCategory, Money, MonthKey, MonthlyBudgetRecord,
    MonthlyBudgetResult, Transaction,
};

/// Error reported by a budget-math implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BudgetMathError {
    #[error("budget calculation failed for {month}: {reason}")]
    Calculation { month: MonthKey, reason: String },

    #[error("invalid budget input: {0}")]
    InvalidInput(String),
}

/// Everything handed to the budget-math library for one month
#[derive(Debug, Clone, Copy)]
pub struct BudgetInputs<'a> {
    pub transactions: &'a [Transaction],
    pub monthly_budgets: &'a [MonthlyBudgetRecord],
    pub categories: &'a [Category],
    pub master_categories: &'a [MasterCategory],
    pub accounts: &'a [AccountSummary],
}

/// The external budget-math contract.
///
/// Implementations must be pure: the same month and inputs always give the
/// same result, which is what makes caching by month key valid.
pub trait BudgetCalculator {
    fn calculate_monthly_budget(
        &self,
        month: MonthKey,
        inputs: &BudgetInputs<'_>,
    ) -> Result<MonthlyBudgetResult, BudgetMathError>;
}

/// Per-month results, shared read-only with every consumer of one pass
#[derive(Debug, Clone, Default)]
pub struct MonthlyCache {
    entries: Arc<HashMap<MonthKey, MonthlyBudgetResult>>,
    failed: Arc<Vec<MonthKey>>,
}

impl MonthlyCache {
    pub fn get(&self, month: MonthKey) -> Option<&MonthlyBudgetResult> {
        self.entries.get(&month)
    }

    pub fn contains(&self, month: MonthKey) -> bool {
        self.entries.contains_key(&month)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Months whose calculation failed and hold a zeroed result
    pub fn failed_months(&self) -> &[MonthKey] {
        &self.failed
    }

    /// Results for the given months, skipping months not in the cache
    pub fn results_for<'a>(
        &'a self,
        months: &'a [MonthKey],
    ) -> impl Iterator<Item = &'a MonthlyBudgetResult> + 'a {
        months.iter().filter_map(move |m| self.entries.get(m))
    }
}

/// Drop tombstoned categories and masters before they reach budget math
fn live_categories(categories: &[Category]) -> Vec<Category> {
    categories.iter().filter(|c| !c.is_tombstone).cloned().collect()
}

fn live_masters(masters: &[MasterCategory]) -> Vec<MasterCategory> {
    masters.iter().filter(|m| !m.is_tombstone).cloned().collect()
}

/// Aggregate every month in `months`.
///
/// The full transaction set is passed for each month (budget math needs the
/// history for carryover). Errors are logged and isolated per month.
pub fn aggregate_months<C: BudgetCalculator + ?Sized>(
    calculator: &C,
    months: &[MonthKey],
    transactions: &[Transaction],
    monthly_budgets: &[MonthlyBudgetRecord],
    categories: &[Category],
    master_categories: &[MasterCategory],
    accounts: &[Account],
) -> MonthlyCache {
    let categories = live_categories(categories);
    let master_categories = live_masters(master_categories);
    let accounts: Vec<AccountSummary> = accounts.iter().map(Account::summary).collect();

    let inputs = BudgetInputs {
        transactions,
        monthly_budgets,
        categories: &categories,
        master_categories: &master_categories,
        accounts: &accounts,
    };

    let mut entries = HashMap::with_capacity(months.len());
    let mut failed = Vec::new();

    for &month in months {
        let result = match calculator.calculate_monthly_budget(month, &inputs) {
            Ok(result) => result,
            Err(err) => {
                warn!(month = %month, error = %err, "budget calculation failed; using zeroed month");
                failed.push(month);
                MonthlyBudgetResult::zeroed()
            }
        };
        entries.insert(month, result);
    }

    debug!(
        months = months.len(),
        failed = failed.len(),
        transactions = transactions.len(),
        "aggregated monthly budgets"
    );

    MonthlyCache {
        entries: Arc::new(entries),
        failed: Arc::new(failed),
    }
}

/// Header figures for the center month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: Option<MonthKey>,
    pub income: Money,
    pub deferred_income: Money,
    pub from_last_month: Money,
    pub last_month_overspent: Money,
    pub total_budgeted: Money,
    pub available_to_budget: Money,
}

impl MonthSummary {
    /// Summary for `month`; all zeros when the month is not aggregated
    pub fn for_month(cache: &MonthlyCache, month: MonthKey) -> Self {
        match cache.get(month) {
            Some(result) => Self {
                month: Some(month),
                income: result.income,
                deferred_income: result.deferred_income,
                from_last_month: result.from_last_month,
                last_month_overspent: result.last_month_overspent,
                total_budgeted: result.total_budgeted,
                available_to_budget: result.available_to_budget,
            },
            None => Self {
                month: Some(month),
                ..Self::default()
            },
        }
    }

    /// Available-to-budget rebuilt from its components
    pub fn derived_available_to_budget(&self) -> Money {
        self.from_last_month + self.last_month_overspent + self.income + self.deferred_income
            - self.total_budgeted
    }

    /// Compare the rebuilt figure with the reported one. A mismatch is only
    /// logged; the reported figure is always what gets displayed.
    pub fn check_consistency(&self) -> bool {
        let derived = self.derived_available_to_budget();
        let consistent = derived.approx_eq(self.available_to_budget);
        if !consistent {
            warn!(
                month = %self.month.map(|m| m.to_string()).unwrap_or_default(),
                from_last_month = self.from_last_month.value(),
                last_month_overspent = self.last_month_overspent.value(),
                income = self.income.value(),
                deferred_income = self.deferred_income.value(),
                total_budgeted = self.total_budgeted.value(),
                reported = self.available_to_budget.value(),
                derived = derived.value(),
                "available-to-budget does not match its components"
            );
        }
        consistent
    }
}
