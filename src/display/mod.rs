//! Display formatting for terminal output
//!
//! Provides utilities for formatting the budget grid, the month summary and
//! the selection panel. Reports format themselves.

pub mod grid;

pub use grid::{format_grid, format_selection_rows, format_summary};
