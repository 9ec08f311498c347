use std::collections::BTreeSet;

use crate::models::money::format_money;
use crate::models::savings::{ClientStats, MonthlySavingsPoint, WindowSummary, YearGroup};

/// Minimum number of months with real savings before the trimmed mean applies.
/// Dropping one high and one low leaves at least 4 values.
pub const TRIM_MIN_DELTAS: usize = 6;

/// Derives statistics and year groups from a window of monthly savings.
///
/// Every month without a usable `real_savings` is excluded from aggregates,
/// never counted as zero. All functions are pure: same window, same result.
pub struct SavingsService;

impl SavingsService {
    pub fn new() -> Self {
        Self
    }

    /// Compute range-aware stats over `months` (ascending).
    ///
    /// Returns `None` for an empty window. With `normalize` and at least
    /// [`TRIM_MIN_DELTAS`] usable months, the average is a trimmed mean that
    /// drops exactly one lowest and one highest month; otherwise it's the
    /// plain mean (and `is_normalized` stays false).
    pub fn compute_stats(&self, months: &[MonthlySavingsPoint], normalize: bool) -> Option<ClientStats> {
        let last = months.last()?;

        let deltas: Vec<(&MonthlySavingsPoint, f64)> = months
            .iter()
            .filter_map(|m| m.real_savings_value().map(|d| (m, d)))
            .collect();

        // Strict comparisons keep the first month on ties.
        let mut best: Option<(&MonthlySavingsPoint, f64)> = None;
        let mut worst: Option<(&MonthlySavingsPoint, f64)> = None;
        for &(m, d) in &deltas {
            if best.map_or(true, |(_, b)| d > b) {
                best = Some((m, d));
            }
            if worst.map_or(true, |(_, w)| d < w) {
                worst = Some((m, d));
            }
        }

        let mut is_normalized = false;
        let avg = if normalize && deltas.len() >= TRIM_MIN_DELTAS {
            let mut sorted: Vec<f64> = deltas.iter().map(|&(_, d)| d).collect();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let trimmed = &sorted[1..sorted.len() - 1];
            is_normalized = true;
            Some(trimmed.iter().sum::<f64>() / trimmed.len() as f64)
        } else if !deltas.is_empty() {
            Some(deltas.iter().map(|&(_, d)| d).sum::<f64>() / deltas.len() as f64)
        } else {
            None
        };

        Some(ClientStats {
            current_cash: last.cash_end.clone(),
            last_month_delta: last.real_savings.clone(),
            avg_monthly_delta: avg.map(format_money),
            is_normalized,
            best_month: best.map(|(m, _)| m.clone()),
            worst_month: worst.map(|(m, _)| m.clone()),
            delta_count: deltas.len(),
        })
    }

    /// Whether the "sin outliers" toggle can take effect for this many deltas.
    pub fn can_normalize(&self, delta_count: usize) -> bool {
        delta_count >= TRIM_MIN_DELTAS
    }

    /// Group an ascending window by calendar year for the table.
    ///
    /// Groups come newest year first and months inside a group newest first,
    /// i.e. the window is reversed for display before grouping.
    pub fn group_by_year(&self, months: &[MonthlySavingsPoint], current_year: i32) -> Vec<YearGroup> {
        let current = current_year.to_string();
        let mut groups: Vec<YearGroup> = Vec::new();

        for m in months.iter().rev() {
            let year = m.year();
            match groups.last_mut() {
                Some(group) if group.year == year => group.months.push(m.clone()),
                _ => groups.push(YearGroup {
                    year: year.to_string(),
                    months: vec![m.clone()],
                    year_delta: 0.0,
                    is_current: year == current,
                }),
            }
        }

        for group in &mut groups {
            group.year_delta = group
                .months
                .iter()
                .filter_map(MonthlySavingsPoint::real_savings_value)
                .sum();
        }

        groups
    }

    /// Years that start collapsed when grouping: every year but the current one.
    pub fn default_collapsed_years(&self, months: &[MonthlySavingsPoint], current_year: i32) -> BTreeSet<String> {
        let current = current_year.to_string();
        months
            .iter()
            .map(|m| m.year())
            .filter(|y| *y != current)
            .map(str::to_string)
            .collect()
    }

    /// Count and bounds of the shown window; `None` when it is empty.
    pub fn window_summary(&self, months: &[MonthlySavingsPoint]) -> Option<WindowSummary> {
        let first = months.first()?;
        let last = months.last()?;
        Some(WindowSummary {
            count: months.len(),
            first_month: first.month.clone(),
            last_month: last.month.clone(),
        })
    }
}

impl Default for SavingsService {
    fn default() -> Self {
        Self::new()
    }
}
