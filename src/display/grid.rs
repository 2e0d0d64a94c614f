//! Budget grid display formatting
//!
//! Renders the grid (one block of budgeted/activity/available columns per
//! month), the month summary header and the selection panel. Overspent
//! cells carry a trailing `!` on their available figure.

use crate::config::ColumnConfig;
use crate::grid::{GridRow, GridView};
use crate::models::{MonthValues, Money};
use crate::services::{MonthSummary, SelectionRow};

/// Value columns shown for every month, in order
pub const VALUE_COLUMNS: [&str; 3] = ["budgeted", "activity", "available"];

const NAME_COLUMN: &str = "name";
const DEFAULT_NAME_WIDTH: u16 = 28;
const DEFAULT_VALUE_WIDTH: u16 = 12;

fn value_for(values: &MonthValues, column: &str) -> Money {
    match column {
        "budgeted" => values.budgeted,
        "activity" => values.activity,
        _ => values.available,
    }
}

fn fit(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    } else {
        s.to_string()
    }
}

/// Format the grid rows for terminal display
pub fn format_grid(
    view: &GridView,
    rows: &[GridRow],
    columns: &ColumnConfig,
    currency_symbol: &str,
) -> String {
    if rows.is_empty() {
        return "No categories to show.\n".to_string();
    }

    let name_width = columns.width_or(NAME_COLUMN, DEFAULT_NAME_WIDTH) as usize;
    let visible: Vec<(&str, usize)> = VALUE_COLUMNS
        .iter()
        .filter(|c| columns.is_visible(c))
        .map(|c| (*c, columns.width_or(c, DEFAULT_VALUE_WIDTH) as usize))
        .collect();
    let block_width: usize = visible.iter().map(|(_, w)| w + 1).sum();

    let mut output = String::new();

    // Month headers
    output.push_str(&format!("{:<name_width$}", "", name_width = name_width));
    for month in &view.months {
        output.push_str(&format!(" {:^width$}", month.to_string(), width = block_width.saturating_sub(1)));
    }
    output.push('\n');

    // Column headers
    output.push_str(&format!("{:<name_width$}", "Category", name_width = name_width));
    for _ in &view.months {
        for (column, width) in &visible {
            output.push_str(&format!(" {:>width$}", fit(&capitalize(column), *width), width = *width));
        }
    }
    output.push('\n');
    output.push_str(&"-".repeat(name_width + block_width * view.months.len()));
    output.push('\n');

    for row in rows {
        let marker = if !row.is_master() {
            "    "
        } else if row.expanded {
            "[-] "
        } else {
            "[+] "
        };
        let label = fit(&format!("{}{}", marker, row.name), name_width);
        output.push_str(&format!("{:<name_width$}", label, name_width = name_width));

        for values in &row.values {
            for (column, width) in &visible {
                let mut amount = value_for(values, column).format_with_symbol(currency_symbol);
                if *column == "available" && values.is_overspent() {
                    amount.push('!');
                }
                output.push_str(&format!(" {:>width$}", fit(&amount, *width), width = *width));
            }
        }
        output.push('\n');
    }

    output
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format the header figures of the center month
pub fn format_summary(summary: &MonthSummary, currency_symbol: &str) -> String {
    let month = summary
        .month
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    let money = |m: Money| m.format_with_symbol(currency_symbol);

    let mut output = String::new();
    output.push_str(&format!("Budget for {}\n", month));
    output.push_str(&format!("  Funds for {:<20} {:>14}\n", month, money(summary.income)));
    output.push_str(&format!("  {:<30} {:>14}\n", "Deferred income", money(summary.deferred_income)));
    output.push_str(&format!("  {:<30} {:>14}\n", "Not budgeted last month", money(summary.from_last_month)));
    output.push_str(&format!("  {:<30} {:>14}\n", "Overspent last month", money(summary.last_month_overspent)));
    output.push_str(&format!("  {:<30} {:>14}\n", "Budgeted this month", money(-summary.total_budgeted)));
    output.push_str(&format!("  {:<30} {:>14}\n", "Available to budget", money(summary.available_to_budget)));
    output
}

/// Format the transaction panel for a selection; dates use the strftime
/// `date_format`
pub fn format_selection_rows(
    title: &str,
    rows: &[SelectionRow],
    currency_symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", title));

    if rows.is_empty() {
        output.push_str("  No transactions.\n");
        return output;
    }

    let show_category = rows.iter().any(|r| r.category_name.is_some());

    for row in rows {
        let category = if show_category {
            format!("{:<18} ", fit(row.category_name.as_deref().unwrap_or(""), 18))
        } else {
            String::new()
        };
        let split = if row.is_split { " (split)" } else { "" };
        let memo = if row.memo.is_empty() {
            String::new()
        } else {
            format!("  {}", row.memo)
        };

        output.push_str(&format!(
            "  {} {:<20} {:<16} {}{:>14}{}{}\n",
            row.date.format(date_format),
            fit(&row.payee, 20),
            fit(&row.account_name, 16),
            category,
            row.amount.format_with_symbol(currency_symbol),
            split,
            memo
        ));
    }

    let total: Money = rows.iter().map(|r| r.amount).sum();
    output.push_str(&format!(
        "  {} transaction(s), total {}\n",
        rows.len(),
        total.format_with_symbol(currency_symbol)
    ));
    output
}
