//! Selection resolver
//!
//! Maps the selected grid cell (a category, a master category or an income
//! row, in one month) onto the transactions behind it, for the side panel.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    Account, AccountId, Category, CategoryId, Money, Selection, SplitLine, Transaction,
    TransactionId,
};

use super::category::CategoryStructure;
use super::income::is_income_transaction;

/// One line in the transaction panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRow {
    pub transaction_id: TransactionId,
    pub date: NaiveDate,
    pub amount: Money,
    pub payee: String,
    pub account_name: String,
    pub memo: String,
    pub flag: Option<String>,
    pub is_split: bool,
    /// Only set when a master category is selected
    pub category_name: Option<String>,
    pub transfer_account_id: Option<AccountId>,
}

/// Resolves selections against one snapshot of the budget
pub struct SelectionResolver<'a> {
    transactions: &'a [Transaction],
    structure: &'a CategoryStructure,
    category_names: HashMap<&'a str, &'a str>,
    account_names: HashMap<&'a str, &'a str>,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(
        transactions: &'a [Transaction],
        structure: &'a CategoryStructure,
        categories: &'a [Category],
        accounts: &'a [Account],
    ) -> Self {
        Self {
            transactions,
            structure,
            category_names: categories
                .iter()
                .map(|c| (c.entity_id.as_str(), c.name.as_str()))
                .collect(),
            account_names: accounts
                .iter()
                .map(|a| (a.entity_id.as_str(), a.name.as_str()))
                .collect(),
        }
    }

    /// Transactions behind a selection, newest first. Unknown ids resolve to
    /// an empty list.
    pub fn resolve(&self, selection: &Selection) -> Vec<SelectionRow> {
        let mut rows = if selection.is_income() {
            self.resolve_income(selection)
        } else {
            self.resolve_categories(selection)
        };
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    fn resolve_income(&self, selection: &Selection) -> Vec<SelectionRow> {
        let month = selection.month();
        let payee_key = selection.income_payee_key();

        self.transactions
            .iter()
            .filter(|t| is_income_transaction(t) && t.month_key() == month)
            .filter(|t| payee_key.map_or(true, |key| t.payee_key() == key))
            .map(|t| self.row(t, None))
            .collect()
    }

    fn resolve_categories(&self, selection: &Selection) -> Vec<SelectionRow> {
        let month = selection.month();
        let annotate = selection.is_master();
        let ids: HashSet<CategoryId> = if annotate {
            self.structure.subcategory_ids(selection.id())
        } else {
            [CategoryId::from(selection.id())].into_iter().collect()
        };

        if ids.is_empty() {
            return Vec::new();
        }

        let mut rows = Vec::new();
        for txn in self.transactions.iter().filter(|t| t.month_key() == month) {
            if txn.is_split() {
                for line in &txn.sub_transactions {
                    let Some(id) = line.category_id.as_ref().filter(|id| ids.contains(*id)) else {
                        continue;
                    };
                    let name = annotate.then(|| self.category_name(id));
                    rows.push(self.split_row(txn, line, name));
                }
            } else if let Some(id) = txn.category_id.as_ref().filter(|id| ids.contains(*id)) {
                let name = annotate.then(|| self.category_name(id));
                rows.push(self.row(txn, name));
            }
        }
        rows
    }

    fn category_name(&self, id: &CategoryId) -> String {
        self.structure
            .category(id.as_str())
            .map(|c| c.name.as_str())
            .or_else(|| self.category_names.get(id.as_str()).copied())
            .unwrap_or("Unknown")
            .to_string()
    }

    fn account_name(&self, id: &AccountId) -> String {
        self.account_names
            .get(id.as_str())
            .copied()
            .unwrap_or("Unknown")
            .to_string()
    }

    fn row(&self, txn: &Transaction, category_name: Option<String>) -> SelectionRow {
        SelectionRow {
            transaction_id: txn.id.clone(),
            date: txn.date,
            amount: txn.amount,
            payee: txn.payee.clone(),
            account_name: self.account_name(&txn.account_id),
            memo: txn.memo_str().to_string(),
            flag: txn.flag.clone(),
            is_split: txn.is_split(),
            category_name,
            transfer_account_id: txn.transfer_account_id.clone(),
        }
    }

    /// Split lines become their own rows; the memo falls back to the parent's
    fn split_row(
        &self,
        txn: &Transaction,
        line: &SplitLine,
        category_name: Option<String>,
    ) -> SelectionRow {
        let memo = line
            .memo
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| txn.memo_str())
            .to_string();

        SelectionRow {
            amount: line.amount,
            memo,
            is_split: true,
            ..self.row(txn, category_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MasterCategory, MonthKey};
    use crate::services::income::IMMEDIATE_INCOME_CATEGORY_ID;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn june() -> MonthKey {
        MonthKey::parse("2024-06").unwrap()
    }

    struct Fixture {
        transactions: Vec<Transaction>,
        structure: CategoryStructure,
        categories: Vec<Category>,
        accounts: Vec<Account>,
    }

    fn fixture() -> Fixture {
        let masters = vec![
            MasterCategory::new("MasterCategory/everyday", "Everyday"),
            MasterCategory::new("MasterCategory/bills", "Bills"),
        ];
        let categories = vec![
            Category::new("Category/food", "Food", "MasterCategory/everyday"),
            Category::new("Category/fuel", "Fuel", "MasterCategory/everyday"),
            Category::new("Category/rent", "Rent", "MasterCategory/bills"),
        ];
        let structure =
            CategoryStructure::build(&categories, &masters, &HashSet::new(), false);
        let accounts = vec![Account::new("Account/1", "Checking")];

        let transactions = vec![
            Transaction::new("t1", "Account/1", date("2024-06-02"), -50.0)
                .with_category("Category/food")
                .with_payee("Grocer")
                .with_memo("weekly shop"),
            Transaction::new("t2", "Account/1", date("2024-06-10"), -30.0)
                .with_payee("Mart")
                .with_memo("parent memo")
                .with_splits(vec![
                    SplitLine::new("Category/food", -10.0).with_memo("snacks"),
                    SplitLine::new("Category/fuel", -15.0),
                    SplitLine::new("Category/rent", -5.0),
                ]),
            Transaction::new("t3", "Account/1", date("2024-06-20"), -900.0)
                .with_category("Category/rent")
                .with_payee("Landlord"),
            Transaction::new("t4", "Account/1", date("2024-05-30"), -12.0)
                .with_category("Category/food"),
            Transaction::new("t5", "Account/1", date("2024-06-01"), 1000.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID)
                .with_payee("Acme"),
            Transaction::new("t6", "Account/1", date("2024-06-15"), 250.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID)
                .with_payee("Side Gig"),
        ];

        Fixture {
            transactions,
            structure,
            categories,
            accounts,
        }
    }

    impl Fixture {
        fn resolver(&self) -> SelectionResolver<'_> {
            SelectionResolver::new(
                &self.transactions,
                &self.structure,
                &self.categories,
                &self.accounts,
            )
        }
    }

    #[test]
    fn test_leaf_category_selection() {
        let fx = fixture();
        let rows = fx
            .resolver()
            .resolve(&Selection::category("Category/food", june(), "Food"));

        assert_eq!(rows.len(), 2);
        // Newest first
        assert_eq!(rows[0].date, date("2024-06-10"));
        assert!(rows[0].is_split);
        assert_eq!(rows[0].amount, Money::new(-10.0));
        assert_eq!(rows[0].memo, "snacks");
        assert_eq!(rows[1].memo, "weekly shop");
        assert_eq!(rows[1].account_name, "Checking");
        assert!(rows.iter().all(|r| r.category_name.is_none()));
    }

    #[test]
    fn test_master_selection_annotates_subcategories() {
        let fx = fixture();
        let rows = fx
            .resolver()
            .resolve(&Selection::master("MasterCategory/everyday", june(), "Everyday"));

        assert_eq!(rows.len(), 3);
        let names: HashSet<String> = rows.iter().filter_map(|r| r.category_name.clone()).collect();
        assert_eq!(rows.iter().filter(|r| r.category_name.is_some()).count(), 3);
        let children: HashSet<String> = ["Food", "Fuel"].iter().map(|s| s.to_string()).collect();
        assert!(names.is_subset(&children));

        let fuel = rows.iter().find(|r| r.category_name.as_deref() == Some("Fuel")).unwrap();
        assert_eq!(fuel.memo, "parent memo");
    }

    #[test]
    fn test_income_master_selection() {
        let fx = fixture();
        let rows = fx
            .resolver()
            .resolve(&Selection::master("__income__", june(), "Income"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].payee, "Side Gig");
        assert_eq!(rows[1].payee, "Acme");
    }

    #[test]
    fn test_income_payee_selection() {
        let fx = fixture();
        let rows = fx
            .resolver()
            .resolve(&Selection::category("income_Acme", june(), "Acme"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Money::new(1000.0));
    }

    #[test]
    fn test_unknown_selection_is_empty() {
        let fx = fixture();
        let resolver = fx.resolver();
        assert!(resolver
            .resolve(&Selection::master("MasterCategory/none", june(), "None"))
            .is_empty());
        assert!(resolver
            .resolve(&Selection::category("Category/none", june(), "None"))
            .is_empty());
        assert!(resolver
            .resolve(&Selection::category("income_Nobody", june(), "Nobody"))
            .is_empty());
    }

    #[test]
    fn test_other_months_are_excluded() {
        let fx = fixture();
        let may = MonthKey::parse("2024-05").unwrap();
        let rows = fx
            .resolver()
            .resolve(&Selection::category("Category/food", may, "Food"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Money::new(-12.0));
    }
}
