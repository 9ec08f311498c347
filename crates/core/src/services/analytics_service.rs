use crate::models::evolution::{EvolutionHeadline, HoverPoint, PeriodReturn, RangeReturn};
use crate::models::series::{SeriesValue, TimedPoint};

/// Live value and last snapshot closer than this are considered equal.
pub const LIVE_TOLERANCE: f64 = 0.01;

/// Computes range returns over evolution series and the chart headline.
///
/// Works on any [`SeriesValue`] series: asset position value, renta-variable
/// snapshot value, monthly cash balance. Inputs are already range-filtered.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// First vs last value of the window.
    ///
    /// Fewer than 2 points is `Insufficient`. The percentage is 0 when the
    /// first value is zero or negative, never NaN or infinite.
    pub fn range_return<P: SeriesValue>(&self, points: &[P]) -> RangeReturn {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return RangeReturn::Insufficient;
        };
        if points.len() < 2 {
            return RangeReturn::Insufficient;
        }

        let first = first.value().unwrap_or(0.0);
        let last = last.value().unwrap_or(0.0);
        let absolute_delta = last - first;
        let percent_delta = if first > 0.0 {
            (absolute_delta / first) * 100.0
        } else {
            0.0
        };

        RangeReturn::Computed(PeriodReturn {
            first,
            last,
            absolute_delta,
            percent_delta,
        })
    }

    /// Build the chart header for a window.
    ///
    /// While hovering, the hovered point is shown as-is. Otherwise the live
    /// value is shown (falling back to the last snapshot), flagged as
    /// "updated now" when it differs from the last snapshot by more than
    /// [`LIVE_TOLERANCE`].
    pub fn headline(
        &self,
        period: RangeReturn,
        live_value: Option<f64>,
        live_cost_basis: Option<f64>,
        hover: Option<&HoverPoint>,
    ) -> EvolutionHeadline {
        let last_snapshot = period.period().map_or(0.0, |p| p.last);
        let live = live_value.unwrap_or(last_snapshot);

        if let Some(h) = hover {
            return EvolutionHeadline {
                display_value: h.value,
                display_cost_basis: h.cost_basis,
                display_timestamp: Some(h.timestamp),
                is_live_updated: false,
                period,
            };
        }

        let is_live_updated = period.is_sufficient() && (live - last_snapshot).abs() > LIVE_TOLERANCE;

        EvolutionHeadline {
            display_value: live,
            display_cost_basis: live_cost_basis,
            display_timestamp: None,
            is_live_updated,
            period,
        }
    }

    /// Hover state for the point at `index` of the window; `None` outside it.
    pub fn hover_at<P: TimedPoint>(&self, points: &[P], index: usize) -> Option<HoverPoint> {
        points.get(index).map(HoverPoint::from_point)
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
