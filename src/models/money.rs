//! Money type for representing currency amounts
//!
//! YNAB4 budgets store amounts as floating-point numbers, so every comparison
//! against zero goes through a fixed currency-rounding tolerance of one cent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Tolerance used for every zero/equality comparison on amounts
pub const EPSILON: f64 = 0.01;

/// A signed currency amount (outflows are negative)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create a Money amount from a raw value
    ///
    /// # Examples
    /// ```
    /// use envelope_grid::models::Money;
    /// let amount = Money::new(10.5);
    /// assert_eq!(amount.value(), 10.5);
    /// ```
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get the raw value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Amount rounded to whole cents
    pub fn cents(&self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    /// Check if the amount is zero within [`EPSILON`]
    pub fn is_zero(&self) -> bool {
        self.0.abs() < EPSILON
    }

    /// Check if the amount is non-zero within [`EPSILON`]
    pub fn is_nonzero(&self) -> bool {
        !self.is_zero()
    }

    /// Strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Compare two amounts within [`EPSILON`]
    pub fn approx_eq(&self, other: Money) -> bool {
        (self.0 - other.0).abs() < EPSILON
    }

    /// Format with a currency symbol, rounded to cents
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.abs();
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(cents / 100),
            cents % 100
        )
    }

    /// Plain two-decimal rendering for spreadsheets
    pub fn to_plain_string(&self) -> String {
        let cents = self.cents();
        let sign = if cents < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, cents.abs() / 100, cents.abs() % 100)
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}
