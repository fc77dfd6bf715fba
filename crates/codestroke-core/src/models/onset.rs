use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dosing::BodyWeight;
use crate::window;

/// Highest score the severity scale can produce.
pub const SEVERITY_MAX: u32 = 42;

/// Stage 1 data: onset, severity, and bedside vitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OnsetAssessment {
    pub onset_unknown: bool,
    /// Last known well. Required unless `onset_unknown`.
    pub last_known_well: Option<Timestamp>,
    /// When on, discovery time follows last known well.
    #[serde(default = "default_true")]
    pub discovery_same_as_lkw: bool,
    /// Only read when `discovery_same_as_lkw` is off.
    pub discovery_override: Option<Timestamp>,
    /// Opaque score from the external severity calculator (0-42).
    pub severity_score: u32,
    pub systolic: u32,
    pub diastolic: u32,
    /// mg/dL.
    pub glucose: u32,
    pub weight: BodyWeight,
    pub pressure_treatment_active: bool,
    pub low_glucose_reviewed: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OnsetAssessment {
    fn default() -> Self {
        Self {
            onset_unknown: false,
            last_known_well: None,
            discovery_same_as_lkw: true,
            discovery_override: None,
            severity_score: 0,
            systolic: 0,
            diastolic: 0,
            glucose: 0,
            weight: BodyWeight::default(),
            pressure_treatment_active: false,
            low_glucose_reviewed: false,
        }
    }
}

impl OnsetAssessment {
    /// Onset used for every window calculation. `None` when unknown.
    pub fn onset(&self) -> Option<Timestamp> {
        if self.onset_unknown {
            None
        } else {
            self.last_known_well
        }
    }

    /// Symptom discovery time, derived from LKW unless overridden.
    pub fn discovered_at(&self) -> Option<Timestamp> {
        if self.discovery_same_as_lkw {
            self.last_known_well
        } else {
            self.discovery_override.or(self.last_known_well)
        }
    }

    /// Apply the future-onset correction to the LKW field.
    pub fn with_corrected_onset(mut self, now: Timestamp) -> Self {
        self.last_known_well = self
            .last_known_well
            .map(|lkw| window::correct_future_onset(lkw, now));
        self
    }

    pub fn elapsed_hours(&self, now: Timestamp) -> f64 {
        window::elapsed_hours(self.onset(), now)
    }
}

/// Pressure ceiling a patient must be under (or actively treated toward)
/// before reperfusion therapy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PressureLimit {
    pub systolic: u32,
    pub diastolic: u32,
}

impl PressureLimit {
    pub fn exceeded_by(&self, systolic: u32, diastolic: u32) -> bool {
        systolic > self.systolic || diastolic > self.diastolic
    }
}

impl Default for PressureLimit {
    fn default() -> Self {
        Self {
            systolic: 185,
            diastolic: 110,
        }
    }
}
