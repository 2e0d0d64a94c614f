//! Transaction model
//!
//! Mirrors the YNAB4 transaction record: a signed amount on an account,
//! optionally categorised, optionally split into sub-transactions, optionally
//! a transfer to another account.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, PayeeId, TransactionId};
use super::money::Money;
use super::month::MonthKey;

/// Payee key used when a transaction has neither a payee id nor a name
pub const UNKNOWN_PAYEE_KEY: &str = "unknown";

/// Prefix YNAB4 uses for the synthetic payees of transfer transactions
pub const TRANSFER_PAYEE_PREFIX: &str = "Payee/Transfer:";

/// Cleared state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClearedStatus {
    #[default]
    Uncleared,
    Cleared,
    Reconciled,
}

impl ClearedStatus {
    /// Cleared or reconciled
    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared | Self::Reconciled)
    }

    /// Single-character marker for register columns
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Uncleared => " ",
            Self::Cleared => "C",
            Self::Reconciled => "R",
        }
    }
}

impl fmt::Display for ClearedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncleared => write!(f, "Uncleared"),
            Self::Cleared => write!(f, "Cleared"),
            Self::Reconciled => write!(f, "Reconciled"),
        }
    }
}

/// One line of a split transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Same sign convention as the parent transaction
    pub amount: Money,

    #[serde(default)]
    pub memo: Option<String>,
}

impl SplitLine {
    pub fn new(category_id: impl Into<CategoryId>, amount: impl Into<Money>) -> Self {
        Self {
            category_id: Some(category_id.into()),
            amount: amount.into(),
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "entityId")]
    pub id: TransactionId,

    pub date: NaiveDate,

    /// Positive for inflow, negative for outflow
    pub amount: Money,

    pub account_id: AccountId,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    #[serde(default)]
    pub payee_id: Option<PayeeId>,

    /// Payee display name
    #[serde(default)]
    pub payee: String,

    /// Set when this is one side of a transfer
    #[serde(default)]
    pub transfer_account_id: Option<AccountId>,

    #[serde(default)]
    pub sub_transactions: Vec<SplitLine>,

    #[serde(default)]
    pub cleared: ClearedStatus,

    #[serde(default)]
    pub flag: Option<String>,

    #[serde(default)]
    pub memo: Option<String>,
}

impl Transaction {
    /// Create a new uncategorised transaction
    pub fn new(
        id: impl Into<TransactionId>,
        account_id: impl Into<AccountId>,
        date: NaiveDate,
        amount: impl Into<Money>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            amount: amount.into(),
            account_id: account_id.into(),
            category_id: None,
            payee_id: None,
            payee: String::new(),
            transfer_account_id: None,
            sub_transactions: Vec::new(),
            cleared: ClearedStatus::Uncleared,
            flag: None,
            memo: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = payee.into();
        self
    }

    pub fn with_payee_id(mut self, payee_id: impl Into<PayeeId>) -> Self {
        self.payee_id = Some(payee_id.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_splits(mut self, splits: Vec<SplitLine>) -> Self {
        self.sub_transactions = splits;
        self
    }

    pub fn with_transfer(mut self, account_id: impl Into<AccountId>) -> Self {
        self.transfer_account_id = Some(account_id.into());
        self
    }

    /// Check if this is a split transaction
    pub fn is_split(&self) -> bool {
        !self.sub_transactions.is_empty()
    }

    /// A transfer either names its counter-account or uses a transfer payee
    pub fn is_transfer(&self) -> bool {
        self.transfer_account_id.is_some()
            || self
                .payee_id
                .as_ref()
                .is_some_and(|p| p.as_str().starts_with(TRANSFER_PAYEE_PREFIX))
    }

    /// Inflows include zero-amount transactions
    pub fn is_inflow(&self) -> bool {
        self.amount.value() >= 0.0
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }

    /// The month this transaction falls in
    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    /// Grouping key for payees: id, else display name, else a fixed sentinel
    pub fn payee_key(&self) -> &str {
        if let Some(id) = &self.payee_id {
            return id.as_str();
        }
        if !self.payee.is_empty() {
            return &self.payee;
        }
        UNKNOWN_PAYEE_KEY
    }

    pub fn memo_str(&self) -> &str {
        self.memo.as_deref().unwrap_or("")
    }

    /// Total of all split lines (upstream guarantees it equals `amount`)
    pub fn splits_total(&self) -> Money {
        self.sub_transactions.iter().map(|s| s.amount).sum()
    }
}
