use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::series::TimedPoint;

/// First-vs-last comparison over a filtered window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    pub first: f64,
    pub last: f64,
    pub absolute_delta: f64,
    /// Percent change; 0 when `first` is zero or negative
    pub percent_delta: f64,
}

/// Outcome of a range-return computation.
///
/// `Insufficient` is a display state (fewer than 2 points), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeReturn {
    Insufficient,
    Computed(PeriodReturn),
}

impl RangeReturn {
    pub fn period(&self) -> Option<&PeriodReturn> {
        match self {
            RangeReturn::Computed(p) => Some(p),
            RangeReturn::Insufficient => None,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self, RangeReturn::Computed(_))
    }

    /// Drives the up/down colour. An insufficient window counts as flat (positive).
    pub fn is_positive(&self) -> bool {
        self.period().map_or(true, |p| p.last >= p.first)
    }
}

/// The exact chart point under the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverPoint {
    pub value: f64,
    pub cost_basis: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl HoverPoint {
    pub fn from_point<P: TimedPoint>(point: &P) -> Self {
        Self {
            value: point.value().unwrap_or(0.0),
            cost_basis: point.cost_basis(),
            timestamp: point.captured_at(),
        }
    }
}

/// What the chart header shows: hovered point, or live value plus range return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionHeadline {
    pub display_value: f64,
    pub display_cost_basis: Option<f64>,
    /// Set only while hovering
    pub display_timestamp: Option<DateTime<Utc>>,
    /// Live value differs from the last snapshot ("actualizado ahora")
    pub is_live_updated: bool,
    pub period: RangeReturn,
}
