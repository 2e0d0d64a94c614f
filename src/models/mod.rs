//! Core data models for envelope-grid
//!
//! This module contains the read-only snapshots the engine derives views
//! from: accounts, transactions, categories, monthly budget records and the
//! results reported by the budget-math library.

pub mod account;
pub mod budget;
pub mod category;
pub mod classification;
pub mod ids;
pub mod money;
pub mod month;
pub mod selection;
pub mod transaction;

pub use account::{Account, AccountSummary};
pub use budget::{
    CategoryMonthResult, MasterMonthResult, MonthValues, MonthlyBudgetRecord, MonthlyBudgetResult,
    OverspendingHandling,
};
pub use category::{Category, MasterCategory};
pub use classification::Classification;
pub use ids::{AccountId, CategoryId, MasterCategoryId, PayeeId, TransactionId};
pub use money::Money;
pub use month::{MonthKey, MonthKeyParseError};
pub use selection::{Selection, INCOME_CATEGORY_PREFIX, INCOME_MASTER_ID};
pub use transaction::{ClearedStatus, SplitLine, Transaction};
