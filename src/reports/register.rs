//! Account Register
//!
//! Chronological running balances for one account (or every account), shown
//! newest or oldest first.
//!
//! Balances come from a single ascending pass: by date, and on the same day
//! inflows before outflows so a deposit and a withdrawal on one day never
//! produce a transient negative balance. Display order is derived afterwards
//! and never changes a balance.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::models::{
    Account, AccountId, Category, ClearedStatus, Money, Transaction, TransactionId,
};

/// Display order of the register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "oldest" => Ok(Self::Asc),
            "desc" | "descending" | "newest" => Ok(Self::Desc),
            other => Err(GridError::Validation(format!(
                "Invalid sort direction '{}'. Use 'asc' or 'desc'",
                other
            ))),
        }
    }
}

/// Which transactions the register covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterScope {
    Account(AccountId),
    /// Every account; balances are meaningless here and reported as zero
    All,
}

/// Chronological order used for balances: date ascending, inflows first on
/// the same day
fn ascending(a: &Transaction, b: &Transaction) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| b.is_inflow().cmp(&a.is_inflow()))
}

/// Order transactions for display. Descending reverses both the date and
/// the same-day tie-break.
pub fn sort_for_display(transactions: &mut [&Transaction], direction: SortDirection) {
    match direction {
        SortDirection::Asc => transactions.sort_by(|a, b| ascending(a, b)),
        SortDirection::Desc => transactions.sort_by(|a, b| ascending(b, a)),
    }
}

/// Running balance after each transaction, keyed by transaction id
pub fn running_balances(transactions: &[&Transaction]) -> HashMap<TransactionId, Money> {
    let mut ordered: Vec<&Transaction> = transactions.to_vec();
    ordered.sort_by(|a, b| ascending(a, b));

    let mut balance = Money::zero();
    ordered
        .into_iter()
        .map(|txn| {
            balance += txn.amount;
            (txn.id.clone(), balance)
        })
        .collect()
}

/// A single entry in the register
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEntry {
    pub transaction_id: TransactionId,
    pub date: NaiveDate,
    pub account_name: String,
    pub payee: String,
    /// Category name, or "Split", "Transfer" or "Uncategorized"
    pub category: String,
    pub memo: String,
    pub amount: Money,
    pub running_balance: Money,
    pub cleared: ClearedStatus,
    pub flag: Option<String>,
    pub is_split: bool,
    pub is_transfer: bool,
}

/// Filter options for the register. Filtering hides rows but never changes
/// a balance.
#[derive(Debug, Clone, Default)]
pub struct RegisterFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive partial match on the payee name
    pub payee_contains: Option<String>,
    pub cleared: Option<ClearedStatus>,
    pub uncategorized_only: bool,
}

impl RegisterFilter {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.payee_contains.is_none()
            && self.cleared.is_none()
            && !self.uncategorized_only
    }

    /// Check if a transaction matches this filter
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(start) = self.start_date {
            if txn.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if txn.date > end {
                return false;
            }
        }

        if let Some(ref payee) = self.payee_contains {
            if !txn.payee.to_lowercase().contains(&payee.to_lowercase()) {
                return false;
            }
        }

        if let Some(cleared) = self.cleared {
            if txn.cleared != cleared {
                return false;
            }
        }

        if self.uncategorized_only
            && (txn.category_id.is_some() || txn.is_split() || txn.is_transfer())
        {
            return false;
        }

        true
    }
}

/// Summary statistics for a register
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSummary {
    pub total_entries: usize,
    /// Cleared or reconciled entries
    pub cleared_count: usize,
    pub total_inflows: Money,
    pub total_outflows: Money,
    pub net_change: Money,
    /// Balance after every transaction in scope, filtered or not
    pub ending_balance: Money,
}

/// Account register
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRegister {
    /// `None` for the all-accounts register
    pub account_id: Option<AccountId>,
    pub title: String,
    pub sort: SortDirection,
    pub entries: Vec<RegisterEntry>,
    pub summary: RegisterSummary,
}

impl AccountRegister {
    /// Build a register.
    ///
    /// Fails only when `scope` names an account that does not exist.
    pub fn generate(
        transactions: &[Transaction],
        scope: &RegisterScope,
        sort: SortDirection,
        accounts: &[Account],
        categories: &[Category],
        filter: &RegisterFilter,
    ) -> GridResult<Self> {
        let account_names: HashMap<&str, &str> = accounts
            .iter()
            .map(|a| (a.entity_id.as_str(), a.name.as_str()))
            .collect();
        let category_names: HashMap<&str, &str> = categories
            .iter()
            .map(|c| (c.entity_id.as_str(), c.name.as_str()))
            .collect();

        let (account_id, title, mut in_scope): (Option<AccountId>, String, Vec<&Transaction>) =
            match scope {
                RegisterScope::Account(id) => {
                    let name = account_names
                        .get(id.as_str())
                        .ok_or_else(|| GridError::account_not_found(id.as_str()))?;
                    (
                        Some(id.clone()),
                        name.to_string(),
                        transactions.iter().filter(|t| &t.account_id == id).collect(),
                    )
                }
                RegisterScope::All => (None, "All Accounts".to_string(), transactions.iter().collect()),
            };

        let balances = match scope {
            RegisterScope::Account(_) => running_balances(&in_scope),
            RegisterScope::All => HashMap::new(),
        };
        let ending_balance: Money = match scope {
            RegisterScope::Account(_) => in_scope.iter().map(|t| t.amount).sum(),
            RegisterScope::All => Money::zero(),
        };

        sort_for_display(&mut in_scope, sort);

        let entries: Vec<RegisterEntry> = in_scope
            .into_iter()
            .filter(|t| filter.matches(t))
            .map(|txn| RegisterEntry {
                transaction_id: txn.id.clone(),
                date: txn.date,
                account_name: account_names
                    .get(txn.account_id.as_str())
                    .copied()
                    .unwrap_or("Unknown")
                    .to_string(),
                payee: txn.payee.clone(),
                category: category_label(txn, &category_names),
                memo: txn.memo_str().to_string(),
                amount: txn.amount,
                running_balance: balances.get(&txn.id).copied().unwrap_or_default(),
                cleared: txn.cleared,
                flag: txn.flag.clone(),
                is_split: txn.is_split(),
                is_transfer: txn.is_transfer(),
            })
            .collect();

        let summary = summarize(&entries, ending_balance);

        Ok(Self {
            account_id,
            title,
            sort,
            entries,
            summary,
        })
    }

    /// Whether running balances are meaningful for this register
    pub fn has_balances(&self) -> bool {
        self.account_id.is_some()
    }

    /// Format the register for terminal display, with dates rendered in the
    /// strftime `date_format`
    pub fn format_terminal(&self, currency_symbol: &str, date_format: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Account Register: {}\n", self.title));
        output.push_str(&"=".repeat(100));
        output.push('\n');

        let show_account = !self.has_balances();
        let middle = if show_account { "Account" } else { "Category" };

        output.push_str(&format!(
            "{:<12} {:<20} {:<20} {:>14} {:>14} {:>4}\n",
            "Date", "Payee", middle, "Amount", "Balance", "Clr"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for entry in &self.entries {
            let middle = if show_account {
                &entry.account_name
            } else {
                &entry.category
            };
            let balance = if self.has_balances() {
                entry.running_balance.format_with_symbol(currency_symbol)
            } else {
                String::new()
            };

            output.push_str(&format!(
                "{:<12} {:<20} {:<20} {:>14} {:>14} {:>4}\n",
                entry.date.format(date_format).to_string(),
                truncate(&entry.payee, 18),
                truncate(middle, 18),
                entry.amount.format_with_symbol(currency_symbol),
                balance,
                entry.cleared.marker()
            ));
        }

        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "Total Inflows:  {}  |  Total Outflows: {}  |  Transactions: {}\n",
            self.summary.total_inflows.format_with_symbol(currency_symbol),
            self.summary.total_outflows.abs().format_with_symbol(currency_symbol),
            self.summary.total_entries
        ));
        if self.has_balances() {
            output.push_str(&format!(
                "Ending Balance: {}\n",
                self.summary.ending_balance.format_with_symbol(currency_symbol)
            ));
        }

        output
    }
}

fn category_label(txn: &Transaction, category_names: &HashMap<&str, &str>) -> String {
    if txn.is_transfer() {
        "Transfer".to_string()
    } else if txn.is_split() {
        "Split".to_string()
    } else if let Some(id) = &txn.category_id {
        category_names
            .get(id.as_str())
            .copied()
            .unwrap_or("Unknown")
            .to_string()
    } else {
        "Uncategorized".to_string()
    }
}

fn summarize(entries: &[RegisterEntry], ending_balance: Money) -> RegisterSummary {
    let total_inflows: Money = entries
        .iter()
        .filter(|e| e.amount.is_positive())
        .map(|e| e.amount)
        .sum();
    let total_outflows: Money = entries
        .iter()
        .filter(|e| e.amount.is_negative())
        .map(|e| e.amount)
        .sum();

    RegisterSummary {
        total_entries: entries.len(),
        cleared_count: entries.iter().filter(|e| e.cleared.is_cleared()).count(),
        total_inflows,
        total_outflows,
        net_change: total_inflows + total_outflows,
        ending_balance,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        s.to_string()
    }
}
