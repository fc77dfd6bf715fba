//! Elapsed-time and treatment-window classification.
//!
//! Every function here is pure. Callers pass "now" explicitly and must
//! re-derive on every read: an elapsed value goes stale as soon as the
//! clock advances.

use jiff::{SignedDuration, Timestamp, Zoned, civil};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Upper bound (inclusive) of the standard thrombolysis window.
pub const STANDARD_WINDOW_HOURS: f64 = 4.5;
/// Upper bound (inclusive) of the extended, imaging-selected window.
pub const EXTENDED_WINDOW_HOURS: f64 = 9.0;
/// Upper bound (inclusive) of the late thrombectomy window.
pub const LATE_EVT_WINDOW_HOURS: f64 = 24.0;
/// Window-dependent contraindications apply in `(3.0, 4.5]`.
pub const WINDOW_FINDINGS_LOWER_HOURS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TreatmentWindow {
    /// 0 to 4.5 h: standard IV thrombolysis.
    WithinStandard,
    /// 4.5 to 9 h: extended window, imaging selection required.
    Extended,
    /// 9 to 24 h: late thrombectomy only.
    LateEvt,
    /// Beyond 24 h.
    Outside,
}

impl TreatmentWindow {
    pub fn label(self) -> &'static str {
        match self {
            Self::WithinStandard => "Within 4.5 h (standard)",
            Self::Extended => "4.5-9 h (extended)",
            Self::LateEvt => "9-24 h (late EVT)",
            Self::Outside => "Beyond 24 h",
        }
    }

    /// Whether IV thrombolysis is still considered in this window.
    pub fn thrombolysis_considered(self) -> bool {
        matches!(self, Self::WithinStandard | Self::Extended)
    }
}

/// Hours between `onset` and `now`, floored at zero. An absent onset
/// yields zero.
pub fn elapsed_hours(onset: Option<Timestamp>, now: Timestamp) -> f64 {
    onset_elapsed_hours(onset, now).unwrap_or(0.0)
}

/// Like [`elapsed_hours`] but keeps "no onset" distinct from "zero hours".
pub fn onset_elapsed_hours(onset: Option<Timestamp>, now: Timestamp) -> Option<f64> {
    let onset = onset?;
    let millis = now.as_millisecond() - onset.as_millisecond();
    Some((millis as f64 / MILLIS_PER_HOUR).max(0.0))
}

/// Map elapsed hours to exactly one window. Boundary values fall into
/// the lower, more permissive band. NaN lands in `Outside`.
pub fn classify_window(hours: f64) -> TreatmentWindow {
    if hours <= STANDARD_WINDOW_HOURS {
        TreatmentWindow::WithinStandard
    } else if hours <= EXTENDED_WINDOW_HOURS {
        TreatmentWindow::Extended
    } else if hours <= LATE_EVT_WINDOW_HOURS {
        TreatmentWindow::LateEvt
    } else {
        TreatmentWindow::Outside
    }
}

/// Whether window-dependent contraindications are in force.
pub fn window_findings_apply(hours: Option<f64>) -> bool {
    matches!(hours, Some(h) if h > WINDOW_FINDINGS_LOWER_HOURS && h <= STANDARD_WINDOW_HOURS)
}

/// Resolve a wall-clock entry ("last seen at 14:30") against the current
/// zoned time. An entry later than now refers to yesterday.
pub fn resolve_wall_clock(time: civil::Time, now: &Zoned) -> Result<Timestamp, CoreError> {
    let tz = now.time_zone().clone();
    let today = now.date().to_datetime(time).to_zoned(tz.clone())?;
    if today.timestamp() <= now.timestamp() {
        return Ok(today.timestamp());
    }

    let yesterday = now.date().yesterday()?.to_datetime(time).to_zoned(tz)?;
    tracing::debug!(entered = %time, resolved = %yesterday, "wall-clock onset rolled back one day");
    Ok(yesterday.timestamp())
}

/// Correct an absolute onset that lands in the future (device clock skew,
/// date picker left on today) by rolling it back one day.
pub fn correct_future_onset(onset: Timestamp, now: Timestamp) -> Timestamp {
    if onset <= now {
        return onset;
    }
    match onset.checked_sub(SignedDuration::from_hours(24)) {
        Ok(corrected) => corrected,
        Err(_) => onset,
    }
}
