use chrono::{DateTime, Utc};

use crate::models::chart::SavingsBar;
use crate::models::money::{parse_decimal, parse_optional};
use crate::models::savings::MonthlySavingsPoint;
use crate::models::series::TimedPoint;

/// Bar opacity without a selection, or for the selected bar.
pub const BAR_OPACITY: f64 = 0.85;
/// Opacity of the other bars while a month is selected.
pub const BAR_OPACITY_DIMMED: f64 = 0.35;

const BAR_WIDTH_PX: usize = 30;
const MIN_CHART_WIDTH_PX: usize = 260;

/// Generates chart-ready data sets from the filtered series.
///
/// All numbers are computed here; the renderer only draws them.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// One bar per month that has real savings (months without are skipped).
    ///
    /// Non-selected bars are dimmed while [`ChartService::has_selection`]
    /// holds, even if the selected month itself has no bar.
    pub fn savings_bars(&self, months: &[MonthlySavingsPoint], selected: Option<&str>) -> Vec<SavingsBar> {
        let mut bars: Vec<SavingsBar> = months
            .iter()
            .filter_map(|m| {
                let real_savings = m.real_savings_value()?;
                Some(SavingsBar {
                    month: m.month.clone(),
                    real_savings,
                    cash_delta: parse_optional(m.cash_delta.as_deref()).unwrap_or(0.0),
                    investment_cost_delta: parse_optional(m.investment_cost_delta.as_deref())
                        .unwrap_or(0.0),
                    cash_end: parse_decimal(&m.cash_end).unwrap_or(0.0),
                    is_selected: selected == Some(m.month.as_str()),
                    opacity: BAR_OPACITY,
                })
            })
            .collect();

        if self.has_selection(months, selected) {
            for bar in bars.iter_mut().filter(|b| !b.is_selected) {
                bar.opacity = BAR_OPACITY_DIMMED;
            }
        }

        bars
    }

    /// A selection is active only if the selected month is inside the window.
    pub fn has_selection(&self, months: &[MonthlySavingsPoint], selected: Option<&str>) -> bool {
        selected.is_some_and(|sel| months.iter().any(|m| m.month == sel))
    }

    /// Minimum chart width so bars stay tappable: 30px each, at least 260px.
    pub fn bar_min_width(&self, bars: &[SavingsBar]) -> usize {
        (bars.len() * BAR_WIDTH_PX).max(MIN_CHART_WIDTH_PX)
    }

    /// Label every n-th month on long windows; `None` lets the renderer
    /// keep the first and last labels.
    pub fn month_label_interval(&self, bars: &[SavingsBar]) -> Option<usize> {
        (bars.len() > 24).then(|| bars.len() / 12)
    }

    /// X-axis ticks: every point for short windows, else first, thirds and last.
    pub fn axis_ticks<P: TimedPoint>(&self, points: &[P]) -> Vec<DateTime<Utc>> {
        let n = points.len();
        if n <= 4 {
            return points.iter().map(TimedPoint::captured_at).collect();
        }

        let mut ticks: Vec<DateTime<Utc>> = Vec::with_capacity(4);
        for idx in [0, n / 3, (2 * n) / 3, n - 1] {
            let ts = points[idx].captured_at();
            if !ticks.contains(&ts) {
                ticks.push(ts);
            }
        }
        ticks
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
