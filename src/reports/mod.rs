//! Reports module for envelope-grid
//!
//! The hierarchical income/expense report and the account register.

pub mod classification;
pub mod register;

pub use classification::{
    Breakdown, CategoryLine, ClassificationLine, ClassificationReport, MasterLine, PayeeLine,
};
pub use register::{
    running_balances, sort_for_display, AccountRegister, RegisterEntry, RegisterFilter,
    RegisterScope, RegisterSummary, SortDirection,
};
