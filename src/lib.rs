//! envelope-grid - Budget grid and ledger aggregation for envelope budgets
//!
//! This library derives the views of a YNAB4-style budget from read-only
//! snapshots of its data: the multi-month budget grid with its synthetic
//! income rows, the transactions behind a selected cell, account registers
//! with running balances, and income/expense reports rolled up by
//! user-defined classifications. Month-level budget math is delegated to a
//! [`services::BudgetCalculator`].
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, categories, etc.)
//! - `storage`: Snapshot loading and JSON file helpers
//! - `services`: Month window, aggregation, category structure, income
//! - `grid`: Budget grid state and derived view
//! - `reports`: Classification report and account register
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_grid::grid::BudgetGrid;
//! use envelope_grid::services::{BasicBudgetCalculator, MonthWindow};
//! use envelope_grid::storage::BudgetSnapshot;
//!
//! let snapshot = BudgetSnapshot::load("budget.json")?;
//! let mut grid = BudgetGrid::new(BasicBudgetCalculator::new(), snapshot, MonthWindow::default());
//! for row in grid.rows() {
//!     println!("{}", row.name);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod grid;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{GridError, GridResult};
