//! The `grid` command: multi-month budget grid plus the month summary

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::parse_month;
use crate::config::settings::MAX_VISIBLE_MONTHS;
use crate::config::Settings;
use crate::display::{format_grid, format_summary};
use crate::error::{GridError, GridResult};
use crate::grid::BudgetGrid;
use crate::models::MonthKey;
use crate::services::{BasicBudgetCalculator, MonthWindow};
use crate::storage::BudgetSnapshot;

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Budget snapshot file (JSON)
    #[arg(short, long)]
    pub budget: PathBuf,

    /// Center month (YYYY-MM), defaults to the current month
    #[arg(short, long)]
    pub month: Option<String>,

    /// Number of month columns, overrides settings
    #[arg(long)]
    pub months: Option<usize>,

    /// Hide categories with no figures in the visible months
    #[arg(long)]
    pub only_active: bool,

    /// Show categories under every master
    #[arg(long)]
    pub expand_all: bool,
}

/// Handle the grid command
pub fn handle_grid_command(settings: &Settings, args: GridArgs) -> GridResult<()> {
    let snapshot = BudgetSnapshot::load(&args.budget)?;

    let center = match args.month {
        Some(m) => parse_month(&m)?,
        None => MonthKey::current(),
    };
    let visible = args.months.unwrap_or(settings.visible_months);
    if visible == 0 || visible > MAX_VISIBLE_MONTHS {
        return Err(GridError::Validation(format!(
            "--months must be between 1 and {}",
            MAX_VISIBLE_MONTHS
        )));
    }

    let mut grid = BudgetGrid::new(
        BasicBudgetCalculator::new(),
        snapshot,
        MonthWindow::centered_on(center, visible),
    );
    grid.set_show_only_active(settings.show_only_active || args.only_active);
    if args.expand_all {
        grid.expand_all();
    }

    let rows = grid.rows();
    let view = grid.view();
    info!(months = view.months.len(), rows = rows.len(), "rendering grid");

    println!("{}", format_summary(&view.summary, &settings.currency_symbol));
    print!(
        "{}",
        format_grid(view, &rows, &settings.columns, &settings.currency_symbol)
    );

    Ok(())
}
