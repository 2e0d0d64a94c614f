//! Visible month window
//!
//! Resolves the center month and visible-month count of the grid into the
//! ordered list of month keys to aggregate. The window starts one month
//! before the center so the current month sits in the second column.

use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// Columns shown before the center month
const LEADING_MONTHS: i32 = 1;

/// The grid's month window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    center: MonthKey,
    visible_months: usize,
}

impl MonthWindow {
    /// Build a window from a 0-based center month and a year. Out-of-range
    /// month indexes roll the year over.
    pub fn new(center_month: i32, center_year: i32, visible_months: usize) -> Self {
        Self {
            center: MonthKey::from_index(center_year, center_month),
            visible_months,
        }
    }

    pub fn centered_on(center: MonthKey, visible_months: usize) -> Self {
        Self {
            center,
            visible_months,
        }
    }

    pub fn center(&self) -> MonthKey {
        self.center
    }

    pub fn visible_months(&self) -> usize {
        self.visible_months
    }

    /// Move the center forward one month
    pub fn next(&self) -> Self {
        Self::centered_on(self.center.next(), self.visible_months)
    }

    /// Move the center back one month
    pub fn prev(&self) -> Self {
        Self::centered_on(self.center.prev(), self.visible_months)
    }

    pub fn with_visible_months(&self, visible_months: usize) -> Self {
        Self::centered_on(self.center, visible_months)
    }

    /// Ordered month keys for this window.
    ///
    /// An active selection collapses the range to the selection's month. A
    /// single-column window shows the center month itself rather than the
    /// month before it.
    pub fn resolve(&self, single_month_override: Option<MonthKey>) -> Vec<MonthKey> {
        match single_month_override {
            Some(month) => vec![month],
            None => self.iter().collect(),
        }
    }

    /// The window's months in order, yielding exactly `visible_months` keys
    pub fn iter(&self) -> impl Iterator<Item = MonthKey> {
        let first = if self.visible_months > 1 {
            self.center.shift(-LEADING_MONTHS)
        } else {
            self.center
        };

        std::iter::successors(Some(first), |m| Some(m.next())).take(self.visible_months)
    }
}

impl Default for MonthWindow {
    fn default() -> Self {
        Self::centered_on(MonthKey::current(), 3)
    }
}
