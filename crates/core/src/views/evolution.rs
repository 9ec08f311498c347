use chrono::{DateTime, Utc};

use crate::models::evolution::{EvolutionHeadline, HoverPoint, RangeReturn};
use crate::models::portfolio::{Portfolio, Position};
use crate::models::range::SeriesRange;
use crate::models::series::{AssetPositionPoint, RvPoint, TimedPoint};
use crate::services::analytics_service::AnalyticsService;
use crate::services::chart_service::ChartService;
use crate::services::range_service::RangeService;

/// Value-over-time chart with a range selector and a live headline.
///
/// The series is the snapshot history; the live value (current valuation)
/// is kept apart so the headline can flag when it has moved past the last
/// snapshot.
#[derive(Debug, Clone)]
pub struct EvolutionView<P> {
    points: Vec<P>,
    range: SeriesRange,
    now: DateTime<Utc>,
    live_value: Option<f64>,
    live_cost_basis: Option<f64>,
    hover: Option<HoverPoint>,
}

/// Renta-variable portfolio evolution.
pub type RvOverview = EvolutionView<RvPoint>;

/// Position history of a single asset.
pub type AssetOverview = EvolutionView<AssetPositionPoint>;

impl<P: TimedPoint> EvolutionView<P> {
    pub fn new(mut points: Vec<P>, now: DateTime<Utc>) -> Self {
        points.sort_by_key(|p| p.captured_at());
        Self {
            points,
            range: SeriesRange::default(),
            now,
            live_value: None,
            live_cost_basis: None,
            hover: None,
        }
    }

    pub fn with_range(mut self, range: SeriesRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_live(mut self, value: Option<f64>, cost_basis: Option<f64>) -> Self {
        self.live_value = value;
        self.live_cost_basis = cost_basis;
        self
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn range(&self) -> SeriesRange {
        self.range
    }

    /// Changing range drops the hover: indices refer to the old window.
    pub fn set_range(&mut self, range: SeriesRange) {
        self.range = range;
        self.hover = None;
    }

    /// Points inside the selected range, ascending.
    pub fn window(&self) -> &[P] {
        RangeService::new().filter_points(&self.points, self.range, self.now)
    }

    pub fn range_return(&self) -> RangeReturn {
        AnalyticsService::new().range_return(self.window())
    }

    pub fn headline(&self) -> EvolutionHeadline {
        AnalyticsService::new().headline(
            self.range_return(),
            self.live_value,
            self.live_cost_basis,
            self.hover.as_ref(),
        )
    }

    pub fn axis_ticks(&self) -> Vec<DateTime<Utc>> {
        ChartService::new().axis_ticks(self.window())
    }

    /// Hover the window point at `index`. Outside the window clears the hover.
    pub fn hover_at(&mut self, index: usize) -> Option<&HoverPoint> {
        self.hover = AnalyticsService::new().hover_at(self.window(), index);
        self.hover.as_ref()
    }

    pub fn hovered(&self) -> Option<&HoverPoint> {
        self.hover.as_ref()
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }
}

impl RvOverview {
    /// Renta-variable chart; the live value is the portfolio's market value.
    pub fn from_portfolio(points: Vec<RvPoint>, portfolio: Option<&Portfolio>, now: DateTime<Utc>) -> Self {
        Self::new(points, now).with_live(portfolio.and_then(Portfolio::market_value), None)
    }
}

impl AssetOverview {
    /// Asset chart; the live values come from the current position.
    pub fn from_position(points: Vec<AssetPositionPoint>, position: Option<&Position>, now: DateTime<Utc>) -> Self {
        Self::new(points, now).with_live(
            position.and_then(Position::market_value),
            position.and_then(Position::cost_total),
        )
    }
}
