//! Decimal-string helpers.
//!
//! Money crosses the API boundary as decimal strings and stays that way in
//! every model. These helpers are the only place where strings become `f64`,
//! and only for display-derived arithmetic.

/// Parse a decimal string into a finite `f64`.
///
/// Returns `None` for empty, malformed, or non-finite input so that callers
/// can exclude the value instead of coercing it to zero.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::warn!(value = %raw, "Ignoring malformed decimal value");
            None
        }
    }
}

/// Parse an optional decimal string. `None` stays `None`.
pub fn parse_optional(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_decimal)
}

/// Format a value back into the money domain: exactly 2 fraction digits.
///
/// Rounds like `Number.prototype.toFixed(2)`: the nearest cent on the exact
/// binary value, exact ties away from zero, and no sign on zero (`-0.0`
/// prints as `0.00`, while `-0.001` keeps its sign as `-0.00`).
pub fn format_money(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // A value halfway between two cents is always `odd / 8`, and for such
    // values `magnitude * 100` is exact.
    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let cents = (magnitude * 100.0).ceil();
        return format!("{sign}{:.2}", cents / 100.0);
    }

    format!("{sign}{magnitude:.2}")
}
