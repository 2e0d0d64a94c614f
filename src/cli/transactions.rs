//! The `transactions` command: the transactions behind one grid cell

use std::path::PathBuf;

use clap::Args;

use super::parse_month;
use crate::config::Settings;
use crate::display::format_selection_rows;
use crate::error::{GridError, GridResult};
use crate::grid::BudgetGrid;
use crate::models::{Selection, INCOME_CATEGORY_PREFIX, INCOME_MASTER_ID};
use crate::services::{BasicBudgetCalculator, MonthWindow};
use crate::storage::BudgetSnapshot;

#[derive(Args, Debug)]
pub struct TransactionsArgs {
    /// Budget snapshot file (JSON)
    #[arg(short, long)]
    pub budget: PathBuf,

    /// Category ID (or an `income_<payee>` row)
    #[arg(short, long, conflicts_with = "master", required_unless_present = "master")]
    pub category: Option<String>,

    /// Master category ID (or `__income__`)
    #[arg(long)]
    pub master: Option<String>,

    /// Month (YYYY-MM)
    #[arg(short, long)]
    pub month: String,
}

/// Handle the transactions command
pub fn handle_transactions_command(settings: &Settings, args: TransactionsArgs) -> GridResult<()> {
    let snapshot = BudgetSnapshot::load(&args.budget)?;
    let month = parse_month(&args.month)?;

    let selection = match (args.category, args.master) {
        (Some(id), _) => {
            let name = match id.strip_prefix(INCOME_CATEGORY_PREFIX) {
                Some(payee_key) => payee_key.to_string(),
                None => snapshot
                    .category(&id)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| GridError::category_not_found(id.as_str()))?,
            };
            Selection::category(id, month, name)
        }
        (None, Some(id)) => {
            let name = if id == INCOME_MASTER_ID {
                "Income".to_string()
            } else {
                snapshot
                    .master_category(&id)
                    .map(|m| m.name.clone())
                    .ok_or_else(|| GridError::NotFound {
                        entity_type: "Master category",
                        identifier: id.clone(),
                    })?
            };
            Selection::master(id, month, name)
        }
        (None, None) => {
            return Err(GridError::Validation(
                "Either --category or --master is required".into(),
            ))
        }
    };

    let title = format!("{} {}", selection.name(), selection.month());
    let mut grid = BudgetGrid::new(
        BasicBudgetCalculator::new(),
        snapshot,
        MonthWindow::centered_on(month, 1),
    );
    grid.select(selection);
    let rows = grid.selected_transactions();

    print!(
        "{}",
        format_selection_rows(&title, &rows, &settings.currency_symbol, &settings.date_format)
    );
    Ok(())
}
