use serde::{Deserialize, Serialize};

use super::money::{parse_decimal, parse_optional};
use super::month::{parse_month_key, year_of};
use super::series::SeriesValue;
use crate::errors::CoreError;

/// A note the backend attached to a month (from an account snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthComment {
    pub account_name: String,
    pub date: String,
    pub note: String,
}

/// One calendar month's cash-flow summary.
///
/// Series of these are ascending by `month` and unique per key. All money
/// fields are decimal strings exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySavingsPoint {
    /// Month key, `YYYY-MM`
    pub month: String,

    /// End-of-month cash across all accounts
    pub cash_end: String,

    /// Change in cash since the prior month (null at the series head)
    pub cash_delta: Option<String>,

    /// Change in invested cost basis since the prior month
    pub investment_cost_delta: Option<String>,

    /// `cash_delta - investment_cost_delta`; present only when both are
    pub real_savings: Option<String>,

    #[serde(default)]
    pub comments: Vec<MonthComment>,
}

impl MonthlySavingsPoint {
    /// Year part of the month key.
    pub fn year(&self) -> &str {
        year_of(&self.month)
    }

    /// Parsed real savings. `None` when null or malformed.
    pub fn real_savings_value(&self) -> Option<f64> {
        parse_optional(self.real_savings.as_deref())
    }

    pub fn has_comments(&self) -> bool {
        !self.comments.is_empty()
    }
}

/// Compared on the end-of-month cash balance, so a range return is the
/// change in cash across the window.
impl SeriesValue for MonthlySavingsPoint {
    fn value(&self) -> Option<f64> {
        parse_decimal(&self.cash_end)
    }
}

/// Body of `GET /reports/monthly-savings/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySavingsResponse {
    #[serde(default)]
    pub months: Vec<MonthlySavingsPoint>,
}

/// Range-aware statistics over a window of months.
///
/// Ephemeral: recomputed whenever the window or the normalize flag changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientStats {
    /// `cash_end` of the last month in the window
    pub current_cash: String,

    /// `real_savings` of the last month in the window
    pub last_month_delta: Option<String>,

    /// Mean (or trimmed mean) of real savings, 2 fraction digits
    pub avg_monthly_delta: Option<String>,

    /// Whether `avg_monthly_delta` is the trimmed mean
    pub is_normalized: bool,

    pub best_month: Option<MonthlySavingsPoint>,
    pub worst_month: Option<MonthlySavingsPoint>,

    /// Number of months with a usable real savings value
    pub delta_count: usize,
}

/// Months of one calendar year, as rendered under a collapsible header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: String,

    /// Months of the year in display order (newest first)
    pub months: Vec<MonthlySavingsPoint>,

    /// Sum of non-null real savings over the year
    pub year_delta: f64,

    /// Whether this is the current calendar year
    pub is_current: bool,
}

impl YearGroup {
    pub fn month_count(&self) -> usize {
        self.months.len()
    }
}

/// "Showing N months · from – to" indicator for a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub count: usize,
    pub first_month: String,
    pub last_month: String,
}

/// Parameters of `GET /reports/monthly-savings/`. Both bounds are `YYYY-MM`
/// month keys; the default (no bounds) is the full history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavingsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl SavingsQuery {
    pub fn full_history() -> Self {
        Self::default()
    }

    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Bounds must be month keys, and `from` must not come after `to`.
    pub fn validate(&self) -> Result<(), CoreError> {
        for bound in [&self.from, &self.to].into_iter().flatten() {
            if parse_month_key(bound).is_none() {
                return Err(CoreError::ValidationError(format!(
                    "'{bound}' is not a YYYY-MM month key"
                )));
            }
        }
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            if from > to {
                return Err(CoreError::ValidationError(format!(
                    "'from' month ({from}) must not be after 'to' month ({to})"
                )));
            }
        }
        Ok(())
    }
}
