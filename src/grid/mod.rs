//! Budget grid state
//!
//! `BudgetGrid` owns the inputs of one budget view (the snapshot, the month
//! window, the active-only filter, the expanded masters and the current
//! selection) and derives everything else from them. Any change to an input
//! marks the derived view dirty; the next read rebuilds it in full and
//! replaces the old one.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::models::{
    CategoryId, MasterCategoryId, MonthKey, MonthValues, Selection, INCOME_MASTER_ID,
};
use crate::services::{
    active_category_ids, aggregate_months, BudgetCalculator, CategoryStructure, IncomeMaster,
    MonthSummary, MonthWindow, MonthlyCache, SelectionResolver, SelectionRow,
};
use crate::storage::BudgetSnapshot;

/// Everything derived from the grid's inputs in one pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub months: Vec<MonthKey>,
    #[serde(skip)]
    pub cache: MonthlyCache,
    pub active: HashSet<CategoryId>,
    pub structure: CategoryStructure,
    pub income: IncomeMaster,
    /// Header figures for the center month
    pub summary: MonthSummary,
}

impl GridView {
    /// Figures for a real category across the view's months
    pub fn category_values(&self, category_id: &str) -> Vec<MonthValues> {
        self.months
            .iter()
            .map(|m| {
                self.cache
                    .get(*m)
                    .and_then(|r| r.category(category_id))
                    .map(|c| c.values())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Figures for a master category across the view's months
    pub fn master_values(&self, master_id: &str) -> Vec<MonthValues> {
        self.months
            .iter()
            .map(|m| {
                self.cache
                    .get(*m)
                    .and_then(|r| r.master(master_id))
                    .map(|master| master.values())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Figures for the income master, a payee row or an income category
    pub fn income_values(&self, id: &str) -> Vec<MonthValues> {
        self.months
            .iter()
            .map(|m| self.income.lookup(id, *m))
            .collect()
    }
}

/// What a grid row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    IncomeMaster,
    IncomePayee,
    Master,
    Category,
}

/// One flattened display row, with one value set per visible month
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub kind: RowKind,
    pub id: String,
    pub name: String,
    /// Only meaningful on master rows
    pub expanded: bool,
    pub values: Vec<MonthValues>,
}

impl GridRow {
    pub fn is_master(&self) -> bool {
        matches!(self.kind, RowKind::IncomeMaster | RowKind::Master)
    }

    pub fn depth(&self) -> usize {
        if self.is_master() {
            0
        } else {
            1
        }
    }
}

/// Budget grid over one snapshot
pub struct BudgetGrid<C: BudgetCalculator> {
    calculator: C,
    snapshot: Arc<BudgetSnapshot>,
    window: MonthWindow,
    show_only_active: bool,
    expanded: HashSet<MasterCategoryId>,
    selection: Option<Selection>,
    view: Option<GridView>,
    recomputes: usize,
}

impl<C: BudgetCalculator> BudgetGrid<C> {
    pub fn new(calculator: C, snapshot: impl Into<Arc<BudgetSnapshot>>, window: MonthWindow) -> Self {
        Self {
            calculator,
            snapshot: snapshot.into(),
            window,
            show_only_active: false,
            expanded: HashSet::new(),
            selection: None,
            view: None,
            recomputes: 0,
        }
    }

    fn invalidate(&mut self) {
        self.view = None;
    }

    pub fn snapshot(&self) -> &BudgetSnapshot {
        &self.snapshot
    }

    pub fn window(&self) -> MonthWindow {
        self.window
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn show_only_active(&self) -> bool {
        self.show_only_active
    }

    /// Number of full recompute passes so far
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// Replace the input snapshot
    pub fn set_snapshot(&mut self, snapshot: impl Into<Arc<BudgetSnapshot>>) {
        self.snapshot = snapshot.into();
        self.invalidate();
    }

    pub fn set_window(&mut self, window: MonthWindow) {
        if window != self.window {
            self.window = window;
            self.invalidate();
        }
    }

    pub fn next_month(&mut self) {
        self.set_window(self.window.next());
    }

    pub fn previous_month(&mut self) {
        self.set_window(self.window.prev());
    }

    pub fn set_show_only_active(&mut self, show_only_active: bool) {
        if show_only_active != self.show_only_active {
            self.show_only_active = show_only_active;
            self.invalidate();
        }
    }

    /// Select a cell; the month range collapses to the selection's month
    pub fn select(&mut self, selection: Selection) {
        if self.selection.as_ref() != Some(&selection) {
            self.selection = Some(selection);
            self.invalidate();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.invalidate();
        }
    }

    pub fn is_expanded(&self, master_id: &str) -> bool {
        self.expanded.contains(master_id)
    }

    /// Flip a master row open or closed; returns the new state
    pub fn toggle_expanded(&mut self, master_id: &str) -> bool {
        if self.expanded.remove(master_id) {
            false
        } else {
            self.expanded.insert(MasterCategoryId::from(master_id));
            true
        }
    }

    /// Expand the income master and every displayed master
    pub fn expand_all(&mut self) {
        self.ensure_fresh();
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let ids: Vec<MasterCategoryId> = std::iter::once(MasterCategoryId::from(INCOME_MASTER_ID))
            .chain(view.structure.masters.iter().map(|n| n.master.entity_id.clone()))
            .collect();
        self.expanded.extend(ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    fn ensure_fresh(&mut self) {
        if self.view.is_none() {
            let view = self.recompute();
            self.view = Some(view);
        }
    }

    fn recompute(&mut self) -> GridView {
        self.recomputes += 1;
        let snapshot = &self.snapshot;

        let months = self
            .window
            .resolve(self.selection.as_ref().map(Selection::month));

        let cache = aggregate_months(
            &self.calculator,
            &months,
            &snapshot.transactions,
            &snapshot.monthly_budgets,
            &snapshot.categories,
            &snapshot.master_categories,
            &snapshot.accounts,
        );

        let active = active_category_ids(cache.results_for(&months));
        let structure = CategoryStructure::build(
            &snapshot.categories,
            &snapshot.master_categories,
            &active,
            self.show_only_active,
        );
        let income = IncomeMaster::synthesize(&snapshot.transactions, &months);

        let summary = MonthSummary::for_month(&cache, self.window.center());
        summary.check_consistency();

        debug!(
            pass = self.recomputes,
            months = months.len(),
            active = active.len(),
            masters = structure.masters.len(),
            "recomputed budget grid"
        );

        GridView {
            months,
            cache,
            active,
            structure,
            income,
            summary,
        }
    }

    /// The derived view, rebuilt first if any input changed
    pub fn view(&mut self) -> &GridView {
        let view = match self.view.take() {
            Some(view) => view,
            None => self.recompute(),
        };
        self.view.insert(view)
    }

    /// Flattened rows: the income master and its payees first, then each
    /// master with its categories. Children are listed only under expanded
    /// masters.
    pub fn rows(&mut self) -> Vec<GridRow> {
        self.ensure_fresh();
        let Some(view) = self.view.as_ref() else {
            return Vec::new();
        };

        let mut rows = Vec::new();

        if !view.income.is_empty() {
            let expanded = self.expanded.contains(INCOME_MASTER_ID);
            rows.push(GridRow {
                kind: RowKind::IncomeMaster,
                id: view.income.id.clone(),
                name: view.income.name.clone(),
                expanded,
                values: view.income_values(INCOME_MASTER_ID),
            });
            if expanded {
                rows.extend(view.income.categories.iter().map(|payee| GridRow {
                    kind: RowKind::IncomePayee,
                    id: payee.id.clone(),
                    name: payee.name.clone(),
                    expanded: false,
                    values: view.income_values(&payee.id),
                }));
            }
        }

        for node in &view.structure.masters {
            let master_id = node.master.entity_id.as_str();
            let expanded = self.expanded.contains(master_id);
            rows.push(GridRow {
                kind: RowKind::Master,
                id: master_id.to_string(),
                name: node.master.name.clone(),
                expanded,
                values: view.master_values(master_id),
            });
            if expanded {
                rows.extend(node.categories.iter().map(|category| GridRow {
                    kind: RowKind::Category,
                    id: category.entity_id.to_string(),
                    name: category.name.clone(),
                    expanded: false,
                    values: view.category_values(category.entity_id.as_str()),
                }));
            }
        }

        rows
    }

    /// Transactions behind the current selection, newest first
    pub fn selected_transactions(&mut self) -> Vec<SelectionRow> {
        self.ensure_fresh();
        let (Some(selection), Some(view)) = (self.selection.as_ref(), self.view.as_ref()) else {
            return Vec::new();
        };

        SelectionResolver::new(
            &self.snapshot.transactions,
            &view.structure,
            &self.snapshot.categories,
            &self.snapshot.accounts,
        )
        .resolve(selection)
    }
}
