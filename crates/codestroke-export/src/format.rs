//! Small text formatters shared by the note builder. Every function is
//! total: absent or non-positive inputs become [`PLACEHOLDER`].

use std::fmt::Display;

use jiff::Timestamp;
use jiff::tz::TimeZone;

/// Rendered wherever a value is missing, so every line still appears.
pub const PLACEHOLDER: &str = "\u{2014}";

pub fn clock_time(at: Option<Timestamp>, tz: &TimeZone) -> String {
    match at {
        Some(at) => at.to_zoned(tz.clone()).strftime("%Y-%m-%d %H:%M").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn minutes(value: Option<i64>) -> String {
    match value {
        Some(m) => format!("{m} min"),
        None => PLACEHOLDER.to_string(),
    }
}

/// `75` -> `1 h 15 min`; `40` -> `40 min`.
pub fn duration(total_minutes: i64) -> String {
    let sign = if total_minutes < 0 { "-" } else { "" };
    let abs = total_minutes.unsigned_abs();
    let (h, m) = (abs / 60, abs % 60);
    if h == 0 {
        format!("{sign}{m} min")
    } else {
        format!("{sign}{h} h {m} min")
    }
}

pub fn hours(value: Option<f64>) -> String {
    match value {
        Some(h) => format!("{h:.1} h"),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn positive(value: u32, unit: &str) -> String {
    if value == 0 {
        PLACEHOLDER.to_string()
    } else if unit.is_empty() {
        value.to_string()
    } else {
        format!("{value} {unit}")
    }
}

pub fn mg(value: f64) -> String {
    if value > 0.0 {
        format!("{value:.1} mg")
    } else {
        PLACEHOLDER.to_string()
    }
}

pub fn or_placeholder<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

pub fn text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
