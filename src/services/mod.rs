//! Service layer for the budget grid
//!
//! Pure functions and small stateful helpers that turn a budget snapshot
//! into grid figures: the month window, the category tree, the income
//! rows, per-month aggregation and selection resolution.

pub mod budget;
pub mod calculator;
pub mod category;
pub mod income;
pub mod period;
pub mod selection;

pub use budget::{
    aggregate_months, BudgetCalculator, BudgetInputs, BudgetMathError, MonthSummary,
    MonthlyCache,
};
pub use calculator::BasicBudgetCalculator;
pub use category::{active_category_ids, CategoryStructure, MasterCategoryNode};
pub use income::{IncomeMaster, IncomePayee};
pub use period::MonthWindow;
pub use selection::{SelectionResolver, SelectionRow};
