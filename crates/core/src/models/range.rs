use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Time window selector for monthly series (calendar-month cutoffs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonthRange {
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1A")]
    OneYear,
    #[serde(rename = "2A")]
    TwoYears,
    #[serde(rename = "MAX")]
    Max,
}

impl MonthRange {
    /// All ranges, in selector order.
    pub const ALL: [MonthRange; 5] = [
        MonthRange::ThreeMonths,
        MonthRange::SixMonths,
        MonthRange::OneYear,
        MonthRange::TwoYears,
        MonthRange::Max,
    ];

    /// Lenient parse: unknown tokens fall back to `Max` (no filtering).
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(MonthRange::Max)
    }

    /// Months to go back from today; `None` means the full history.
    pub fn months_back(self) -> Option<u32> {
        match self {
            MonthRange::ThreeMonths => Some(3),
            MonthRange::SixMonths => Some(6),
            MonthRange::OneYear => Some(12),
            MonthRange::TwoYears => Some(24),
            MonthRange::Max => None,
        }
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            MonthRange::ThreeMonths => "3M",
            MonthRange::SixMonths => "6M",
            MonthRange::OneYear => "1A",
            MonthRange::TwoYears => "2A",
            MonthRange::Max => "MAX",
        }
    }

    /// Human description used in subtitles and table titles.
    pub fn description(self) -> &'static str {
        match self {
            MonthRange::ThreeMonths => "últimos 3 meses",
            MonthRange::SixMonths => "últimos 6 meses",
            MonthRange::OneYear => "último año",
            MonthRange::TwoYears => "últimos 2 años",
            MonthRange::Max => "historial completo",
        }
    }

    /// The savings table only groups by year for the full history.
    pub fn groups_by_year(self) -> bool {
        self == MonthRange::Max
    }
}

impl FromStr for MonthRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "3M" => Ok(MonthRange::ThreeMonths),
            "6M" => Ok(MonthRange::SixMonths),
            "1A" => Ok(MonthRange::OneYear),
            "2A" => Ok(MonthRange::TwoYears),
            "MAX" => Ok(MonthRange::Max),
            _ => Err(CoreError::InvalidRange(s.to_string())),
        }
    }
}

impl std::fmt::Display for MonthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Time window selector for daily / sub-daily snapshot series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeriesRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "MAX")]
    Max,
}

impl SeriesRange {
    pub const ALL: [SeriesRange; 6] = [
        SeriesRange::OneDay,
        SeriesRange::OneWeek,
        SeriesRange::OneMonth,
        SeriesRange::ThreeMonths,
        SeriesRange::OneYear,
        SeriesRange::Max,
    ];

    /// Lenient parse: unknown tokens fall back to `Max` (no filtering).
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or(SeriesRange::Max)
    }

    pub fn token(self) -> &'static str {
        match self {
            SeriesRange::OneDay => "1D",
            SeriesRange::OneWeek => "1W",
            SeriesRange::OneMonth => "1M",
            SeriesRange::ThreeMonths => "3M",
            SeriesRange::OneYear => "1Y",
            SeriesRange::Max => "MAX",
        }
    }

    /// Selector label (Spanish: week is "S", year is "A").
    pub fn label(self) -> &'static str {
        match self {
            SeriesRange::OneDay => "1D",
            SeriesRange::OneWeek => "1S",
            SeriesRange::OneMonth => "1M",
            SeriesRange::ThreeMonths => "3M",
            SeriesRange::OneYear => "1A",
            SeriesRange::Max => "MAX",
        }
    }
}

impl FromStr for SeriesRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1D" => Ok(SeriesRange::OneDay),
            "1W" => Ok(SeriesRange::OneWeek),
            "1M" => Ok(SeriesRange::OneMonth),
            "3M" => Ok(SeriesRange::ThreeMonths),
            "1Y" => Ok(SeriesRange::OneYear),
            "MAX" => Ok(SeriesRange::Max),
            _ => Err(CoreError::InvalidRange(s.to_string())),
        }
    }
}

impl std::fmt::Display for SeriesRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
