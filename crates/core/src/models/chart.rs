use serde::{Deserialize, Serialize};

/// One bar of the monthly savings chart.
///
/// The core computes all the numbers; the renderer only draws them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsBar {
    /// Month key, `YYYY-MM`
    pub month: String,

    /// Bar height: the month's real savings
    pub real_savings: f64,

    /// Tooltip breakdown; null deltas are shown as 0
    pub cash_delta: f64,
    pub investment_cost_delta: f64,
    pub cash_end: f64,

    /// Whether this bar is the selected month
    pub is_selected: bool,

    /// Fill opacity: dimmed when another bar is selected
    pub opacity: f64,
}

impl SavingsBar {
    /// Positive bars use the gain colour, negative ones the loss colour.
    pub fn is_positive(&self) -> bool {
        self.real_savings >= 0.0
    }
}
