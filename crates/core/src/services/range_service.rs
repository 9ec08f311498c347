use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, Utc};

use crate::models::month::month_key;
use crate::models::range::{MonthRange, SeriesRange};
use crate::models::savings::MonthlySavingsPoint;
use crate::models::series::TimedPoint;

/// Maps a range token to a cutoff and trims ascending series to it.
///
/// Every filter returns a contiguous suffix of its input: series are sorted
/// ascending, so "everything at or after the cutoff" is a tail slice found by
/// binary search. `Max` returns the input unchanged; empty input stays empty.
///
/// Pure business logic, no I/O. The `*_now` variants read the local clock;
/// everything else takes "now" explicitly.
pub struct RangeService;

impl RangeService {
    pub fn new() -> Self {
        Self
    }

    /// `YYYY-MM` key of the first month kept by `range`, or `None` for `Max`.
    pub fn month_cutoff_key(&self, range: MonthRange, today: NaiveDate) -> Option<String> {
        let months = range.months_back()?;
        let cutoff = shift_months(today, -(months as i32));
        Some(month_key(cutoff))
    }

    /// Keep the months whose key is `>=` the cutoff key.
    pub fn filter_months<'a>(
        &self,
        months: &'a [MonthlySavingsPoint],
        range: MonthRange,
        today: NaiveDate,
    ) -> &'a [MonthlySavingsPoint] {
        let Some(cutoff) = self.month_cutoff_key(range, today) else {
            return months;
        };
        // Month keys are zero-padded, so string order is chronological order.
        let start = months.partition_point(|m| m.month.as_str() < cutoff.as_str());
        &months[start..]
    }

    /// Filter by a raw token; unknown tokens keep the full series.
    pub fn filter_months_by_token<'a>(
        &self,
        months: &'a [MonthlySavingsPoint],
        token: &str,
        today: NaiveDate,
    ) -> &'a [MonthlySavingsPoint] {
        self.filter_months(months, MonthRange::from_token(token), today)
    }

    pub fn filter_months_now<'a>(
        &self,
        months: &'a [MonthlySavingsPoint],
        range: MonthRange,
    ) -> &'a [MonthlySavingsPoint] {
        self.filter_months(months, range, Local::now().date_naive())
    }

    /// Exact cutoff instant for a snapshot series, or `None` for `Max`.
    pub fn series_cutoff(&self, range: SeriesRange, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match range {
            SeriesRange::OneDay => Some(now - Duration::days(1)),
            SeriesRange::OneWeek => Some(now - Duration::days(7)),
            SeriesRange::OneMonth => Some(shift_instant(now, -1)),
            SeriesRange::ThreeMonths => Some(shift_instant(now, -3)),
            SeriesRange::OneYear => Some(shift_instant(now, -12)),
            SeriesRange::Max => None,
        }
    }

    /// Keep the points captured at or after the cutoff.
    pub fn filter_points<'a, P: TimedPoint>(
        &self,
        points: &'a [P],
        range: SeriesRange,
        now: DateTime<Utc>,
    ) -> &'a [P] {
        let Some(cutoff) = self.series_cutoff(range, now) else {
            return points;
        };
        let start = points.partition_point(|p| p.captured_at() < cutoff);
        &points[start..]
    }

    pub fn filter_points_by_token<'a, P: TimedPoint>(
        &self,
        points: &'a [P],
        token: &str,
        now: DateTime<Utc>,
    ) -> &'a [P] {
        self.filter_points(points, SeriesRange::from_token(token), now)
    }

    pub fn filter_points_now<'a, P: TimedPoint>(&self, points: &'a [P], range: SeriesRange) -> &'a [P] {
        self.filter_points(points, range, Utc::now())
    }
}

impl Default for RangeService {
    fn default() -> Self {
        Self::new()
    }
}

/// Move a date by whole calendar months, keeping the day of month.
///
/// A day that doesn't exist in the target month overflows into the next one
/// (31 May − 3 months = 3 March, 29 Feb − 12 months = 1 March), the same way
/// browser `Date` arithmetic behaves. Cutoff keys depend on this.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day0()))))
        .unwrap_or(date)
}

fn shift_instant(now: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    let date = shift_months(now.date_naive(), months);
    date.and_time(now.time()).and_utc()
}
