//! Value formatting for readouts and tables

use chrono::{DateTime, Local, TimeZone};

/// Placeholder for missing values
pub const DASH: &str = "—";

/// Format a readout value with precision scaled to its magnitude.
///
/// `|v| >= 100` gets 1 decimal, `>= 10` gets 2, `>= 1` gets 3, smaller
/// values 4. Missing or non-finite values render as [`DASH`].
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let digits = match v.abs() {
                a if a >= 100.0 => 1,
                a if a >= 10.0 => 2,
                a if a >= 1.0 => 3,
                _ => 4,
            };
            format!("{v:.digits$}")
        }
        _ => DASH.to_string(),
    }
}

/// Fixed-precision value, or [`DASH`]
pub fn fixed_or_dash(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.digits$}"),
        _ => DASH.to_string(),
    }
}

/// Format an epoch in milliseconds as `YYYY-MM-DD HH:MM:SS.mmm` local time.
/// Non-positive epochs render as [`DASH`].
pub fn format_epoch_ms(ms: i64) -> String {
    format_epoch_ms_in(ms, &Local)
}

/// [`format_epoch_ms`] in an explicit time zone
pub fn format_epoch_ms_in<Tz: TimeZone>(ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if ms <= 0 {
        return DASH.to_string();
    }
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string(),
        None => DASH.to_string(),
    }
}
