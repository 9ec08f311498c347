//! `YYYY-MM` month keys and their Spanish display labels.

use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

const MONTH_ABBR: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Build the sortable `YYYY-MM` key for a date (month zero-padded).
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Split a month key into `(year, month)`; `None` if it isn't `YYYY-MM`.
pub fn parse_month_key(key: &str) -> Option<(&str, u32)> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if month.len() != 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// The year part of a month key (first four characters).
pub fn year_of(key: &str) -> &str {
    key.get(..4).unwrap_or(key)
}

/// "2024-03" → "Marzo 2024". Malformed keys are returned unchanged.
pub fn month_long(key: &str) -> String {
    match parse_month_key(key) {
        Some((year, month)) => format!("{} {year}", MONTH_NAMES[(month - 1) as usize]),
        None => key.to_string(),
    }
}

/// "2024-03" → "Mar 2024".
pub fn month_short(key: &str) -> String {
    match parse_month_key(key) {
        Some((year, month)) => format!("{} {year}", MONTH_ABBR[(month - 1) as usize]),
        None => key.to_string(),
    }
}

/// "2024-03" → "Mar '24" (chart axis).
pub fn month_axis(key: &str) -> String {
    match parse_month_key(key) {
        Some((year, month)) => format!("{} '{}", MONTH_ABBR[(month - 1) as usize], &year[2..]),
        None => key.to_string(),
    }
}
