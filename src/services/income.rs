//! Income synthesizer
//!
//! YNAB4 books income against two system categories ("available this
//! month" and "available next month"). The grid shows income as a synthetic
//! master category with one pseudo-category per payee, kept apart from the
//! real category tree.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{
    CategoryId, MonthKey, MonthValues, Money, Transaction, INCOME_CATEGORY_PREFIX,
    INCOME_MASTER_ID,
};

/// System category for income available in the month it arrives
pub const IMMEDIATE_INCOME_CATEGORY_ID: &str = "Category/__ImmediateIncome__";

/// System category for income deferred to the following month
pub const DEFERRED_INCOME_CATEGORY_ID: &str = "Category/__DeferredIncome__";

/// Display name of the synthetic income master
pub const INCOME_MASTER_NAME: &str = "Income";

/// Display name for income with no payee
pub const UNKNOWN_PAYEE_NAME: &str = "Unknown Payee";

/// Check if a category id is one of the two income categories
pub fn is_income_category(category_id: Option<&CategoryId>) -> bool {
    matches!(
        category_id.map(|c| c.as_str()),
        Some(IMMEDIATE_INCOME_CATEGORY_ID) | Some(DEFERRED_INCOME_CATEGORY_ID)
    )
}

/// Positive transaction booked to an income category
pub fn is_income_transaction(txn: &Transaction) -> bool {
    txn.amount.is_positive() && is_income_category(txn.category_id.as_ref())
}

/// Id of the pseudo-category for a payee key
pub fn income_category_id(payee_key: &str) -> String {
    format!("{}{}", INCOME_CATEGORY_PREFIX, payee_key)
}

/// Income from one payee, shown as a pseudo-category
#[derive(Debug, Clone, Serialize)]
pub struct IncomePayee {
    /// `income_<payeeKey>`
    pub id: String,
    pub payee_key: String,
    pub name: String,
    pub is_income: bool,
    /// Total within the visible months
    pub total: Money,
    /// Per-month amounts within the visible months
    pub by_month: BTreeMap<MonthKey, Money>,
    /// Total across every month on record
    pub all_time_total: Money,
    #[serde(skip)]
    history: BTreeMap<MonthKey, Money>,
}

impl IncomePayee {
    pub fn activity(&self, month: MonthKey) -> Money {
        self.history.get(&month).copied().unwrap_or_default()
    }
}

/// The synthetic "Income" master category
#[derive(Debug, Clone, Serialize)]
pub struct IncomeMaster {
    pub id: String,
    pub name: String,
    pub categories: Vec<IncomePayee>,
    pub total: Money,
    pub by_month: BTreeMap<MonthKey, Money>,
    #[serde(skip)]
    by_source: HashMap<CategoryId, BTreeMap<MonthKey, Money>>,
}

#[derive(Default)]
struct PayeeGroup {
    name: String,
    total: Money,
    by_month: BTreeMap<MonthKey, Money>,
}

impl IncomeMaster {
    /// Group income transactions by payee and keep the payees with income
    /// in at least one of `months`, largest visible total first.
    pub fn synthesize(transactions: &[Transaction], months: &[MonthKey]) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, PayeeGroup> = HashMap::new();
        let mut by_source: HashMap<CategoryId, BTreeMap<MonthKey, Money>> = HashMap::new();

        for txn in transactions.iter().filter(|t| is_income_transaction(t)) {
            let key = txn.payee_key().to_string();
            let month = txn.month_key();

            let group = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                PayeeGroup::default()
            });
            if group.name.is_empty() && !txn.payee.is_empty() {
                group.name = txn.payee.clone();
            }
            group.total += txn.amount;
            *group.by_month.entry(month).or_default() += txn.amount;

            if let Some(category_id) = &txn.category_id {
                *by_source
                    .entry(category_id.clone())
                    .or_default()
                    .entry(month)
                    .or_default() += txn.amount;
            }
        }

        let mut categories: Vec<IncomePayee> = order
            .into_iter()
            .filter_map(|key| {
                let group = groups.remove(&key)?;
                let visible: BTreeMap<MonthKey, Money> = months
                    .iter()
                    .map(|m| (*m, group.by_month.get(m).copied().unwrap_or_default()))
                    .collect();

                if !visible.values().any(|v| v.is_nonzero()) {
                    return None;
                }

                let name = if group.name.is_empty() {
                    UNKNOWN_PAYEE_NAME.to_string()
                } else {
                    group.name
                };

                Some(IncomePayee {
                    id: income_category_id(&key),
                    payee_key: key,
                    name,
                    is_income: true,
                    total: visible.values().sum(),
                    by_month: visible,
                    all_time_total: group.total,
                    history: group.by_month,
                })
            })
            .collect();

        categories.sort_by(|a, b| b.total.value().total_cmp(&a.total.value()));

        let by_month: BTreeMap<MonthKey, Money> = months
            .iter()
            .map(|m| (*m, categories.iter().map(|c| c.activity(*m)).sum()))
            .collect();

        Self {
            id: INCOME_MASTER_ID.to_string(),
            name: INCOME_MASTER_NAME.to_string(),
            total: by_month.values().sum(),
            categories,
            by_month,
            by_source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn payee(&self, id: &str) -> Option<&IncomePayee> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Grid figures for an income row: the income master, a payee
    /// pseudo-category or one of the real income categories. Income rows
    /// never carry budgeted or available amounts.
    pub fn lookup(&self, id: &str, month: MonthKey) -> MonthValues {
        let activity = if id == INCOME_MASTER_ID {
            self.by_month.get(&month).copied().unwrap_or_default()
        } else if id.starts_with(INCOME_CATEGORY_PREFIX) {
            self.payee(id).map(|p| p.activity(month)).unwrap_or_default()
        } else {
            self.by_source
                .get(id)
                .and_then(|months| months.get(&month))
                .copied()
                .unwrap_or_default()
        };
        MonthValues::activity_only(activity)
    }
}

impl Default for IncomeMaster {
    fn default() -> Self {
        Self::synthesize(&[], &[])
    }
}
