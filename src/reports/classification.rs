//! Classification Report
//!
//! Hierarchical income/expense report for a date range. Spending rolls up
//! Category -> Master Category -> Classification, income is listed by payee,
//! and every level carries a total plus a per-month breakdown.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, Classification, MasterCategory, Money, MonthKey, Transaction};
use crate::services::income::{is_income_transaction, UNKNOWN_PAYEE_NAME};

/// Key used for transactions or categories without a parent
pub const UNCATEGORIZED_KEY: &str = "uncategorized";

/// Bucket holding masters no classification claims
pub const UNCLASSIFIED_LABEL: &str = "Unclassified";

/// Single bucket used when no classifications are configured
pub const FALLBACK_LABEL: &str = "Expenses";

const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// A total and its per-month breakdown. Every month of the report is
/// present, zero when nothing happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub total: Money,
    pub by_month: BTreeMap<MonthKey, Money>,
}

impl Breakdown {
    fn new(months: &[MonthKey]) -> Self {
        Self {
            total: Money::zero(),
            by_month: months.iter().map(|m| (*m, Money::zero())).collect(),
        }
    }

    fn add(&mut self, month: MonthKey, amount: Money) {
        self.total += amount;
        *self.by_month.entry(month).or_default() += amount;
    }

    fn absorb(&mut self, other: &Breakdown) {
        self.total += other.total;
        for (month, amount) in &other.by_month {
            *self.by_month.entry(*month).or_default() += *amount;
        }
    }

    pub fn month(&self, month: MonthKey) -> Money {
        self.by_month.get(&month).copied().unwrap_or_default()
    }
}

/// Spending in one category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLine {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub amounts: Breakdown,
    #[serde(skip)]
    sort_key: f64,
}

/// Spending in one master category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterLine {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub amounts: Breakdown,
    pub categories: Vec<CategoryLine>,
    #[serde(skip)]
    sort_key: f64,
}

/// One classification bucket
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationLine {
    pub label: String,
    pub is_unclassified: bool,
    #[serde(flatten)]
    pub amounts: Breakdown,
    pub masters: Vec<MasterLine>,
}

/// Income from one payee
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayeeLine {
    pub payee_key: String,
    pub name: String,
    #[serde(flatten)]
    pub amounts: Breakdown,
}

/// Hierarchical income and expense report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub months: Vec<MonthKey>,
    pub income: Vec<PayeeLine>,
    pub total_income: Breakdown,
    /// Spending is reported as positive amounts
    pub classifications: Vec<ClassificationLine>,
    pub total_expenses: Breakdown,
    /// Income minus expenses
    pub net: Breakdown,
}

impl ClassificationReport {
    /// Generate the report for `[start_date, end_date]` (inclusive).
    pub fn generate(
        transactions: &[Transaction],
        categories: &[Category],
        master_categories: &[MasterCategory],
        start_date: NaiveDate,
        end_date: NaiveDate,
        classifications: &[Classification],
    ) -> Self {
        let months = if start_date <= end_date {
            MonthKey::range_inclusive(MonthKey::of(start_date), MonthKey::of(end_date))
        } else {
            Vec::new()
        };

        let in_range: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.date >= start_date && t.date <= end_date && !t.is_transfer())
            .collect();

        let masters = group_expenses(&in_range, categories, master_categories, &months);
        let classifications = classify(masters, classifications, &months);

        let mut total_expenses = Breakdown::new(&months);
        for bucket in &classifications {
            total_expenses.absorb(&bucket.amounts);
        }

        let income = group_income(&in_range, &months);
        let mut total_income = Breakdown::new(&months);
        for payee in &income {
            total_income.absorb(&payee.amounts);
        }

        let mut net = Breakdown::new(&months);
        net.absorb(&total_income);
        for month in &months {
            net.add(*month, -total_expenses.month(*month));
        }

        Self {
            start_date,
            end_date,
            months,
            income,
            total_income,
            classifications,
            total_expenses,
            net,
        }
    }

    pub fn classification(&self, label: &str) -> Option<&ClassificationLine> {
        self.classifications.iter().find(|c| c.label == label)
    }

    pub fn category(&self, category_id: &str) -> Option<&CategoryLine> {
        self.classifications
            .iter()
            .flat_map(|c| c.masters.iter())
            .flat_map(|m| m.categories.iter())
            .find(|c| c.id == category_id)
    }

    pub fn payee(&self, name: &str) -> Option<&PayeeLine> {
        self.income.iter().find(|p| p.name == name)
    }

    /// Column headers matching [`Self::to_rows`]
    pub fn header(&self) -> Vec<String> {
        let mut header = vec![
            "Classification".to_string(),
            "Master Category".to_string(),
            "Category".to_string(),
        ];
        header.extend(self.months.iter().map(|m| m.to_string()));
        header.push("Total".to_string());
        header
    }

    /// Spreadsheet rows: income by payee, each classification with its
    /// masters and categories, then expense and net totals.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();

        for payee in &self.income {
            rows.push(self.row(["Income", "", payee.name.as_str()], &payee.amounts));
        }
        rows.push(self.row(["Income", "", "Total Income"], &self.total_income));

        for bucket in &self.classifications {
            for master in &bucket.masters {
                for category in &master.categories {
                    rows.push(self.row(
                        [bucket.label.as_str(), master.name.as_str(), category.name.as_str()],
                        &category.amounts,
                    ));
                }
                rows.push(self.row([bucket.label.as_str(), master.name.as_str(), "Total"], &master.amounts));
            }
            rows.push(self.row([bucket.label.as_str(), "Total", ""], &bucket.amounts));
        }

        rows.push(self.row(["Total Expenses", "", ""], &self.total_expenses));
        rows.push(self.row(["Net", "", ""], &self.net));
        rows
    }

    fn row(&self, labels: [&str; 3], amounts: &Breakdown) -> Vec<String> {
        let mut row: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        row.extend(self.months.iter().map(|m| amounts.month(*m).to_plain_string()));
        row.push(amounts.total.to_plain_string());
        row
    }

    /// Format the report for terminal display; the range dates use the
    /// strftime `date_format`
    pub fn format_terminal(&self, currency_symbol: &str, date_format: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Income & Expense Report: {} to {}\n",
            self.start_date.format(date_format),
            self.end_date.format(date_format)
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        let mut header = format!("{:<40}", "");
        for month in &self.months {
            header.push_str(&format!(" {:>12}", month.to_string()));
        }
        header.push_str(&format!(" {:>12}\n", "Total"));
        output.push_str(&header);
        output.push_str(&"-".repeat(header.len().saturating_sub(1)));
        output.push('\n');

        let line = |label: String, amounts: &Breakdown| -> String {
            let label = if label.chars().count() > 40 {
                format!("{}...", label.chars().take(37).collect::<String>())
            } else {
                label
            };
            let mut s = format!("{:<40}", label);
            for month in &self.months {
                s.push_str(&format!(
                    " {:>12}",
                    amounts.month(*month).format_with_symbol(currency_symbol)
                ));
            }
            s.push_str(&format!(
                " {:>12}\n",
                amounts.total.format_with_symbol(currency_symbol)
            ));
            s
        };

        output.push_str("INCOME\n");
        for payee in &self.income {
            output.push_str(&line(format!("  {}", payee.name), &payee.amounts));
        }
        output.push_str(&line("Total Income".to_string(), &self.total_income));
        output.push('\n');

        output.push_str("EXPENSES\n");
        for bucket in &self.classifications {
            output.push_str(&line(bucket.label.to_uppercase(), &bucket.amounts));
            for master in &bucket.masters {
                output.push_str(&line(format!("  {}", master.name), &master.amounts));
                for category in &master.categories {
                    output.push_str(&line(format!("    {}", category.name), &category.amounts));
                }
            }
        }
        output.push_str(&line("Total Expenses".to_string(), &self.total_expenses));
        output.push('\n');
        output.push_str(&line("NET".to_string(), &self.net));

        output
    }
}

/// Outflows grouped by category, then by master. Split lines count against
/// their own categories. Reserved system masters are left out.
fn group_expenses(
    transactions: &[&Transaction],
    categories: &[Category],
    master_categories: &[MasterCategory],
    months: &[MonthKey],
) -> Vec<MasterLine> {
    let category_map: HashMap<&str, &Category> =
        categories.iter().map(|c| (c.entity_id.as_str(), c)).collect();
    let master_map: HashMap<&str, &MasterCategory> = master_categories
        .iter()
        .map(|m| (m.entity_id.as_str(), m))
        .collect();

    let mut by_category: HashMap<String, Breakdown> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    let mut record = |category_id: Option<&str>, month: MonthKey, amount: Money| {
        let key = category_id.unwrap_or(UNCATEGORIZED_KEY).to_string();
        by_category
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Breakdown::new(months)
            })
            .add(month, -amount);
    };

    for txn in transactions.iter().filter(|t| t.amount.is_negative()) {
        let month = txn.month_key();
        if txn.is_split() {
            for line in &txn.sub_transactions {
                record(line.category_id.as_ref().map(|c| c.as_str()), month, line.amount);
            }
        } else {
            record(txn.category_id.as_ref().map(|c| c.as_str()), month, txn.amount);
        }
    }

    let mut masters: Vec<MasterLine> = Vec::new();
    for category_key in order {
        let Some(amounts) = by_category.remove(&category_key) else {
            continue;
        };
        let category = category_map.get(category_key.as_str()).copied();
        let master = category.and_then(|c| master_map.get(c.master_category_id.as_str()).copied());

        if master.is_some_and(|m| m.is_report_excluded()) {
            continue;
        }

        let (master_id, master_name, master_sort) = match master {
            Some(m) => (m.entity_id.to_string(), m.name.clone(), m.sortable_index),
            None => (
                UNCATEGORIZED_KEY.to_string(),
                UNCATEGORIZED_NAME.to_string(),
                f64::INFINITY,
            ),
        };

        let line = CategoryLine {
            name: category
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED_NAME.to_string()),
            sort_key: category.map_or(f64::INFINITY, |c| c.sortable_index),
            id: category_key,
            amounts,
        };

        let index = match masters.iter().position(|m| m.id == master_id) {
            Some(index) => index,
            None => {
                masters.push(MasterLine {
                    id: master_id,
                    name: master_name,
                    amounts: Breakdown::new(months),
                    categories: Vec::new(),
                    sort_key: master_sort,
                });
                masters.len() - 1
            }
        };
        let master_line = &mut masters[index];
        master_line.amounts.absorb(&line.amounts);
        master_line.categories.push(line);
    }

    for master in &mut masters {
        master
            .categories
            .sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
    }
    masters.sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
    masters
}

/// Partition masters into the user's buckets, unclaimed ones last
fn classify(
    masters: Vec<MasterLine>,
    classifications: &[Classification],
    months: &[MonthKey],
) -> Vec<ClassificationLine> {
    let bucket = |label: &str, is_unclassified: bool| ClassificationLine {
        label: label.to_string(),
        is_unclassified,
        amounts: Breakdown::new(months),
        masters: Vec::new(),
    };

    if classifications.is_empty() {
        let mut expenses = bucket(FALLBACK_LABEL, false);
        for master in masters {
            expenses.amounts.absorb(&master.amounts);
            expenses.masters.push(master);
        }
        return vec![expenses];
    }

    let mut sorted: Vec<&Classification> = classifications.iter().collect();
    sorted.sort_by_key(|c| c.sort_order);

    let mut buckets: Vec<ClassificationLine> =
        sorted.iter().map(|c| bucket(&c.label, false)).collect();
    let mut unclassified = bucket(UNCLASSIFIED_LABEL, true);

    for master in masters {
        let target = match sorted.iter().position(|c| c.contains(&master.id)) {
            Some(index) => &mut buckets[index],
            None => &mut unclassified,
        };
        target.amounts.absorb(&master.amounts);
        target.masters.push(master);
    }

    if !unclassified.masters.is_empty() {
        buckets.push(unclassified);
    }
    buckets
}

/// Income-category inflows grouped by payee, largest first
fn group_income(transactions: &[&Transaction], months: &[MonthKey]) -> Vec<PayeeLine> {
    let mut payees: Vec<PayeeLine> = Vec::new();

    for txn in transactions.iter().filter(|t| is_income_transaction(t)) {
        let key = txn.payee_key();
        let index = match payees.iter().position(|p| p.payee_key == key) {
            Some(index) => index,
            None => {
                payees.push(PayeeLine {
                    payee_key: key.to_string(),
                    name: String::new(),
                    amounts: Breakdown::new(months),
                });
                payees.len() - 1
            }
        };
        let payee = &mut payees[index];
        if payee.name.is_empty() && !txn.payee.is_empty() {
            payee.name = txn.payee.clone();
        }
        payee.amounts.add(txn.month_key(), txn.amount);
    }

    for payee in &mut payees {
        if payee.name.is_empty() {
            payee.name = UNKNOWN_PAYEE_NAME.to_string();
        }
    }
    payees.sort_by(|a, b| b.amounts.total.value().total_cmp(&a.amounts.total.value()));
    payees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitLine;
    use crate::services::income::IMMEDIATE_INCOME_CATEGORY_ID;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    fn masters() -> Vec<MasterCategory> {
        vec![
            MasterCategory::new("MasterCategory/everyday", "Everyday").with_sort(1.0),
            MasterCategory::new("MasterCategory/bills", "Bills").with_sort(2.0),
            MasterCategory::new("MasterCategory/debt", "Pre-YNAB Debt").with_sort(3.0),
        ]
    }

    fn categories() -> Vec<Category> {
        vec![
            Category::new("Category/A", "Groceries", "MasterCategory/everyday").with_sort(1.0),
            Category::new("Category/B", "Fuel", "MasterCategory/everyday").with_sort(2.0),
            Category::new("Category/rent", "Rent", "MasterCategory/bills"),
            Category::new("Category/card", "Old Card", "MasterCategory/debt"),
        ]
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            Transaction::new("t1", "Account/1", date("2024-06-03"), -50.0).with_category("Category/A"),
            Transaction::new("t2", "Account/1", date("2024-06-10"), -30.0).with_splits(vec![
                SplitLine::new("Category/A", -10.0),
                SplitLine::new("Category/B", -20.0),
            ]),
            Transaction::new("t3", "Account/1", date("2024-06-01"), 1000.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID)
                .with_payee("Acme"),
        ]
    }

    #[test]
    fn test_june_scenario() {
        let report = ClassificationReport::generate(
            &scenario(),
            &categories(),
            &masters(),
            date("2024-06-01"),
            date("2024-06-30"),
            &[],
        );

        assert_eq!(report.months, vec![month("2024-06")]);
        assert_eq!(report.category("Category/A").unwrap().amounts.total, Money::new(60.0));
        assert_eq!(report.category("Category/B").unwrap().amounts.total, Money::new(20.0));
        assert_eq!(report.payee("Acme").unwrap().amounts.total, Money::new(1000.0));
        assert_eq!(report.total_expenses.total, Money::new(80.0));
        assert_eq!(report.net.total, Money::new(920.0));
        assert_eq!(report.net.month(month("2024-06")), Money::new(920.0));

        // No classifications configured: one fallback bucket
        assert_eq!(report.classifications.len(), 1);
        assert_eq!(report.classifications[0].label, FALLBACK_LABEL);
    }

    #[test]
    fn test_transfers_and_out_of_range_are_excluded() {
        let mut txns = scenario();
        txns.push(
            Transaction::new("t4", "Account/1", date("2024-06-12"), -500.0)
                .with_category("Category/A")
                .with_transfer("Account/2"),
        );
        txns.push(
            Transaction::new("t5", "Account/1", date("2024-06-12"), 500.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID)
                .with_payee_id("Payee/Transfer:Account/2"),
        );
        txns.push(Transaction::new("t6", "Account/1", date("2024-07-01"), -5.0).with_category("Category/A"));

        let report = ClassificationReport::generate(
            &txns,
            &categories(),
            &masters(),
            date("2024-06-01"),
            date("2024-06-30"),
            &[],
        );
        assert_eq!(report.total_expenses.total, Money::new(80.0));
        assert_eq!(report.total_income.total, Money::new(1000.0));
    }

    #[test]
    fn test_classification_buckets_and_completeness() {
        let mut txns = scenario();
        txns.push(Transaction::new("t4", "Account/1", date("2024-05-20"), -900.0).with_category("Category/rent"));
        txns.push(Transaction::new("t5", "Account/1", date("2024-06-20"), -15.0));
        txns.push(Transaction::new("t6", "Account/1", date("2024-06-21"), -70.0).with_category("Category/card"));

        let classifications = vec![
            Classification::new("Fun", 2).with_masters(["MasterCategory/everyday"]),
            Classification::new("Fixed", 1).with_masters(["MasterCategory/bills"]),
        ];
        let report = ClassificationReport::generate(
            &txns,
            &categories(),
            &masters(),
            date("2024-05-01"),
            date("2024-06-30"),
            &classifications,
        );

        let labels: Vec<&str> = report.classifications.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Fixed", "Fun", UNCLASSIFIED_LABEL]);
        assert!(report.classifications[2].is_unclassified);

        let uncategorized = report.category(UNCATEGORIZED_KEY).unwrap();
        assert_eq!(uncategorized.amounts.total, Money::new(15.0));
        // Pre-YNAB debt is a reserved master and never reported
        assert!(report.category("Category/card").is_none());

        let fixed = report.classification("Fixed").unwrap();
        assert_eq!(fixed.amounts.month(month("2024-05")), Money::new(900.0));
        assert_eq!(fixed.amounts.month(month("2024-06")), Money::zero());

        let bucket_sum: Money = report.classifications.iter().map(|c| c.amounts.total).sum();
        let category_sum: Money = report
            .classifications
            .iter()
            .flat_map(|c| c.masters.iter())
            .flat_map(|m| m.categories.iter())
            .map(|c| c.amounts.total)
            .sum();
        assert!(bucket_sum.approx_eq(category_sum));
        assert!(bucket_sum.approx_eq(report.total_expenses.total));
        assert_eq!(bucket_sum, Money::new(995.0));
    }

    #[test]
    fn test_income_and_expense_are_mutually_exclusive() {
        let mut txns = scenario();
        // A refund of income is an outflow, so it is spending and not income
        txns.push(
            Transaction::new("t4", "Account/1", date("2024-06-15"), -25.0)
                .with_category(IMMEDIATE_INCOME_CATEGORY_ID)
                .with_payee("Acme"),
        );
        // A positive non-income inflow is neither
        txns.push(Transaction::new("t5", "Account/1", date("2024-06-16"), 40.0).with_category("Category/A"));

        let report = ClassificationReport::generate(
            &txns,
            &categories(),
            &masters(),
            date("2024-06-01"),
            date("2024-06-30"),
            &[],
        );

        let income_ids: Vec<&str> = txns
            .iter()
            .filter(|t| is_income_transaction(t))
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(income_ids, vec!["t3"]);
        assert_eq!(report.total_income.total, Money::new(1000.0));
        assert_eq!(report.total_expenses.total, Money::new(105.0));
        assert!(report.net.total.approx_eq(Money::new(895.0)));
    }

    #[test]
    fn test_rows_layout() {
        let report = ClassificationReport::generate(
            &scenario(),
            &categories(),
            &masters(),
            date("2024-06-01"),
            date("2024-06-30"),
            &[],
        );

        let header = report.header();
        assert_eq!(header, vec!["Classification", "Master Category", "Category", "2024-06", "Total"]);

        let rows = report.to_rows();
        assert!(rows.iter().all(|r| r.len() == header.len()));
        assert_eq!(rows[0], vec!["Income", "", "Acme", "1000.00", "1000.00"]);
        assert_eq!(rows.last().unwrap(), &vec!["Net", "", "", "920.00", "920.00"]);
        assert!(rows.contains(&vec![
            "Expenses".to_string(),
            "Everyday".to_string(),
            "Groceries".to_string(),
            "60.00".to_string(),
            "60.00".to_string(),
        ]));
    }

    #[test]
    fn test_empty_range() {
        let report = ClassificationReport::generate(
            &scenario(),
            &categories(),
            &masters(),
            date("2024-07-01"),
            date("2024-06-01"),
            &[],
        );
        assert!(report.months.is_empty());
        assert!(report.income.is_empty());
        assert_eq!(report.net.total, Money::zero());
        let text = report.format_terminal("$", "%Y-%m-%d");
        assert!(text.contains("NET"));
        assert!(report.format_terminal("$", "%m/%d/%Y").contains("07/01/2024 to 06/01/2024"));
    }
}
