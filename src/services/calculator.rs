//! Stand-in budget calculator
//!
//! A single-month calculator used by the command-line tool so the grid can be
//! rendered without the real budget-math library. It does no carryover and
//! no overspending rollover: every month starts from zero. A month whose
//! transactions or budget records carry a non-finite amount is rejected.

use std::collections::HashMap;

use crate::models::{
    CategoryId, CategoryMonthResult, MasterMonthResult, Money, MonthKey, MonthlyBudgetResult,
};

use super::budget::{BudgetCalculator, BudgetInputs, BudgetMathError};
use super::income::{DEFERRED_INCOME_CATEGORY_ID, IMMEDIATE_INCOME_CATEGORY_ID};

/// Budgeted + activity per month, nothing carried between months
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicBudgetCalculator;

impl BasicBudgetCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl BudgetCalculator for BasicBudgetCalculator {
    fn calculate_monthly_budget(
        &self,
        month: MonthKey,
        inputs: &BudgetInputs<'_>,
    ) -> Result<MonthlyBudgetResult, BudgetMathError> {
        let bad_transaction = inputs
            .transactions
            .iter()
            .filter(|t| t.month_key() == month)
            .find(|t| {
                !t.amount.value().is_finite()
                    || t.sub_transactions.iter().any(|l| !l.amount.value().is_finite())
            });
        if let Some(txn) = bad_transaction {
            return Err(BudgetMathError::InvalidInput(format!(
                "transaction {} has a non-finite amount",
                txn.id
            )));
        }
        if let Some(record) = inputs
            .monthly_budgets
            .iter()
            .find(|r| r.month == month && !r.budgeted.value().is_finite())
        {
            return Err(BudgetMathError::InvalidInput(format!(
                "budget for {} in {} is not a finite amount",
                record.category_id, month
            )));
        }

        let on_budget: Vec<&str> = inputs
            .accounts
            .iter()
            .filter(|a| a.on_budget && !a.is_tombstone)
            .map(|a| a.entity_id.as_str())
            .collect();

        let mut activity: HashMap<&str, Money> = HashMap::new();
        let mut income = Money::zero();
        let mut deferred_income = Money::zero();
        let previous = month.prev();

        for txn in inputs
            .transactions
            .iter()
            .filter(|t| on_budget.contains(&t.account_id.as_str()))
        {
            let category = txn.category_id.as_ref().map(CategoryId::as_str);
            let txn_month = txn.month_key();

            if txn_month == month && category == Some(IMMEDIATE_INCOME_CATEGORY_ID) {
                income += txn.amount;
                continue;
            }
            if txn_month == previous && category == Some(DEFERRED_INCOME_CATEGORY_ID) {
                deferred_income += txn.amount;
                continue;
            }
            if txn_month != month {
                continue;
            }

            if txn.is_split() {
                for line in &txn.sub_transactions {
                    if let Some(id) = &line.category_id {
                        *activity.entry(id.as_str()).or_default() += line.amount;
                    }
                }
            } else if let Some(id) = category {
                *activity.entry(id).or_default() += txn.amount;
            }
        }

        let mut budgeted: HashMap<&str, Money> = HashMap::new();
        for record in inputs.monthly_budgets.iter().filter(|r| r.month == month) {
            *budgeted.entry(record.category_id.as_str()).or_default() += record.budgeted;
        }

        let master_categories: Vec<MasterMonthResult> = inputs
            .master_categories
            .iter()
            .map(|master| {
                let categories = inputs
                    .categories
                    .iter()
                    .filter(|c| c.master_category_id == master.entity_id)
                    .map(|c| {
                        let id = c.entity_id.as_str();
                        let b = budgeted.get(id).copied().unwrap_or_default();
                        let a = activity.get(id).copied().unwrap_or_default();
                        CategoryMonthResult::new(c.entity_id.clone(), b, a, b + a)
                    })
                    .collect();
                MasterMonthResult::from_categories(master.entity_id.clone(), categories)
            })
            .collect();

        let total_budgeted: Money = master_categories.iter().map(|m| m.budgeted).sum();
        let total_activity: Money = master_categories.iter().map(|m| m.activity).sum();

        Ok(MonthlyBudgetResult {
            income,
            deferred_income,
            from_last_month: Money::zero(),
            last_month_overspent: Money::zero(),
            total_budgeted,
            total_activity,
            total_carryover: Money::zero(),
            available_to_budget: income + deferred_income - total_budgeted,
            master_categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Account, AccountSummary, Category, MasterCategory, MonthlyBudgetRecord, SplitLine,
        Transaction,
    };
    use crate::services::budget::MonthSummary;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    #[test]
    fn test_single_month_figures() {
        let categories = vec![
            Category::new("Category/A", "Groceries", "MasterCategory/1"),
            Category::new("Category/B", "Fuel", "MasterCategory/1"),
        ];
        let masters = vec![MasterCategory::new("MasterCategory/1", "Everyday")];
        let accounts: Vec<AccountSummary> = vec![
            Account::new("Account/1", "Checking").summary(),
            Account::off_budget("Account/2", "Brokerage").summary(),
        ];
        let transactions = vec![
            Transaction::new("t1", "Account/1", date("2024-06-02"), -50.0).with_category("Category/A"),
            Transaction::new("t2", "Account/1", date("2024-06-05"), -30.0).with_splits(vec![
                SplitLine::new("Category/A", -10.0),
                SplitLine::new("Category/B", -20.0),
            ]),
            Transaction::new("t3", "Account/1", date("2024-06-01"), 1000.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID),
            Transaction::new("t4", "Account/1", date("2024-05-20"), 100.0)
                .with_category(DEFERRED_INCOME_CATEGORY_ID),
            Transaction::new("t5", "Account/2", date("2024-06-03"), -999.0).with_category("Category/A"),
            Transaction::new("t6", "Account/1", date("2024-07-01"), -5.0).with_category("Category/A"),
        ];
        let budgets = vec![
            MonthlyBudgetRecord::new(month("2024-06"), "Category/A", 100.0),
            MonthlyBudgetRecord::new(month("2024-07"), "Category/A", 500.0),
        ];

        let inputs = BudgetInputs {
            transactions: &transactions,
            monthly_budgets: &budgets,
            categories: &categories,
            master_categories: &masters,
            accounts: &accounts,
        };
        let result = BasicBudgetCalculator::new()
            .calculate_monthly_budget(month("2024-06"), &inputs)
            .unwrap();

        let a = result.category("Category/A").unwrap();
        assert_eq!(a.budgeted, Money::new(100.0));
        assert_eq!(a.activity, Money::new(-60.0));
        assert_eq!(a.available, Money::new(40.0));
        assert_eq!(result.category("Category/B").unwrap().activity, Money::new(-20.0));
        assert_eq!(result.income, Money::new(1000.0));
        assert_eq!(result.deferred_income, Money::new(100.0));
        assert_eq!(result.available_to_budget, Money::new(1000.0));

        let cache_summary = MonthSummary {
            month: Some(month("2024-06")),
            income: result.income,
            deferred_income: result.deferred_income,
            from_last_month: result.from_last_month,
            last_month_overspent: result.last_month_overspent,
            total_budgeted: result.total_budgeted,
            available_to_budget: result.available_to_budget,
        };
        assert!(cache_summary.check_consistency());
    }

    #[test]
    fn test_non_finite_amounts_are_invalid_input() {
        let categories = vec![Category::new("Category/A", "Groceries", "MasterCategory/1")];
        let masters = vec![MasterCategory::new("MasterCategory/1", "Everyday")];
        let accounts = vec![Account::new("Account/1", "Checking").summary()];
        let transactions = vec![
            Transaction::new("t1", "Account/1", date("2024-06-02"), -50.0).with_category("Category/A"),
        ];
        let budgets = vec![MonthlyBudgetRecord::new(month("2024-07"), "Category/A", f64::NAN)];
        let inputs = BudgetInputs {
            transactions: &transactions,
            monthly_budgets: &budgets,
            categories: &categories,
            master_categories: &masters,
            accounts: &accounts,
        };

        let calculator = BasicBudgetCalculator::new();
        assert!(calculator.calculate_monthly_budget(month("2024-06"), &inputs).is_ok());
        assert!(matches!(
            calculator.calculate_monthly_budget(month("2024-07"), &inputs),
            Err(BudgetMathError::InvalidInput(_))
        ));

        let bad = vec![Transaction::new("t2", "Account/1", date("2024-06-09"), f64::INFINITY)];
        let inputs = BudgetInputs {
            transactions: &bad,
            ..inputs
        };
        let err = calculator
            .calculate_monthly_budget(month("2024-06"), &inputs)
            .unwrap_err();
        assert!(err.to_string().contains("transaction t2"));
    }

    #[test]
    fn test_invalid_month_is_isolated_by_aggregation() {
        let categories = vec![Category::new("Category/A", "Groceries", "MasterCategory/1")];
        let masters = vec![MasterCategory::new("MasterCategory/1", "Everyday")];
        let accounts = vec![Account::new("Account/1", "Checking")];
        let budgets = vec![
            MonthlyBudgetRecord::new(month("2024-06"), "Category/A", 100.0),
            MonthlyBudgetRecord::new(month("2024-07"), "Category/A", f64::NAN),
        ];

        let cache = crate::services::aggregate_months(
            &BasicBudgetCalculator::new(),
            &[month("2024-06"), month("2024-07")],
            &[],
            &budgets,
            &categories,
            &masters,
            &accounts,
        );

        assert_eq!(cache.failed_months(), &[month("2024-07")]);
        assert_eq!(cache.get(month("2024-06")).unwrap().total_budgeted, Money::new(100.0));
        assert_eq!(cache.get(month("2024-07")).unwrap().total_budgeted, Money::zero());
    }
}
