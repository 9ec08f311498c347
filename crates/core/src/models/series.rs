use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::parse_decimal;

/// A point of any series the range-return comparator works on.
pub trait SeriesValue {
    /// The value compared across the window, parsed from its decimal string.
    fn value(&self) -> Option<f64>;

    /// Cost basis shown alongside the value on hover, if the series has one.
    fn cost_basis(&self) -> Option<f64> {
        None
    }
}

/// A timestamped point of an ascending evolution series.
pub trait TimedPoint: SeriesValue {
    fn captured_at(&self) -> DateTime<Utc>;
}

/// One snapshot of a single asset position (`GET /assets/{id}/position-history/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPositionPoint {
    #[serde(with = "iso_timestamp")]
    pub captured_at: DateTime<Utc>,
    pub market_value: String,
    pub cost_basis: String,
}

impl TimedPoint for AssetPositionPoint {
    fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

impl SeriesValue for AssetPositionPoint {
    fn value(&self) -> Option<f64> {
        parse_decimal(&self.market_value)
    }

    fn cost_basis(&self) -> Option<f64> {
        parse_decimal(&self.cost_basis)
    }
}

/// One renta-variable (equity holdings) valuation snapshot (`GET /reports/rv-evolution/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RvPoint {
    #[serde(with = "iso_timestamp")]
    pub captured_at: DateTime<Utc>,
    pub value: String,
}

impl TimedPoint for RvPoint {
    fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

impl SeriesValue for RvPoint {
    fn value(&self) -> Option<f64> {
        parse_decimal(&self.value)
    }
}

/// Serde adapter for ISO-8601 timestamps as the backend emits them.
///
/// Accepts RFC 3339 (`2024-06-01T10:00:00+02:00`), naive date-times
/// (taken as UTC) and bare dates (midnight UTC). Always writes RFC 3339.
pub mod iso_timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
