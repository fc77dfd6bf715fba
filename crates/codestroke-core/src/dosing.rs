//! Weight-based thrombolytic dosing.
//!
//! Weight is converted to kilograms and rounded to one decimal once,
//! up front. Every derived quantity starts from that rounded value so
//! rounding never compounds.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

const KG_PER_LB: f64 = 0.453592;

/// Alteplase: 0.9 mg/kg.
pub const ALTEPLASE_MG_PER_KG: f64 = 0.9;
/// Alteplase total-dose cap.
pub const ALTEPLASE_MAX_MG: f64 = 90.0;
/// Share of the alteplase dose given as the immediate bolus.
pub const ALTEPLASE_BOLUS_FRACTION: f64 = 0.1;

/// Tenecteplase weight brackets: `(weight below kg, dose mg)`.
/// Anything at or above the last bracket gets [`TENECTEPLASE_MAX_MG`].
const TENECTEPLASE_BANDS: [(f64, f64); 4] = [(60.0, 15.0), (70.0, 17.5), (80.0, 20.0), (90.0, 22.5)];
pub const TENECTEPLASE_MAX_MG: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BodyWeight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl BodyWeight {
    pub fn kg(value: f64) -> Self {
        Self {
            value,
            unit: WeightUnit::Kg,
        }
    }

    pub fn lb(value: f64) -> Self {
        Self {
            value,
            unit: WeightUnit::Lb,
        }
    }

    /// Weight in kilograms, rounded to one decimal.
    pub fn in_kg(&self) -> f64 {
        to_kg(self.value, self.unit)
    }

    pub fn is_positive(&self) -> bool {
        self.in_kg() > 0.0
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn to_kg(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => round1(value),
        WeightUnit::Lb => round1(value * KG_PER_LB),
    }
}

/// Alteplase dose split into the bolus and the 60-minute infusion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AlteplaseDose {
    pub total_mg: f64,
    pub bolus_mg: f64,
    pub infusion_mg: f64,
}

pub fn alteplase_dose(weight_kg: f64) -> AlteplaseDose {
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return AlteplaseDose::default();
    }
    let weight_kg = round1(weight_kg);
    let total_mg = round1((weight_kg * ALTEPLASE_MG_PER_KG).min(ALTEPLASE_MAX_MG));
    AlteplaseDose {
        total_mg,
        bolus_mg: round1(total_mg * ALTEPLASE_BOLUS_FRACTION),
        infusion_mg: round1(total_mg * (1.0 - ALTEPLASE_BOLUS_FRACTION)),
    }
}

/// Tenecteplase single-bolus dose in mg, by weight bracket.
pub fn tenecteplase_dose_mg(weight_kg: f64) -> f64 {
    if weight_kg.is_nan() || weight_kg <= 0.0 {
        return 0.0;
    }
    let weight_kg = round1(weight_kg);
    TENECTEPLASE_BANDS
        .iter()
        .find(|(below, _)| weight_kg < *below)
        .map(|(_, dose)| *dose)
        .unwrap_or(TENECTEPLASE_MAX_MG)
}

/// Both agents' doses for one weight, for display side by side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DosingSummary {
    pub weight_kg: f64,
    pub alteplase: AlteplaseDose,
    pub tenecteplase_mg: f64,
}

pub fn dosing_summary(weight: &BodyWeight) -> DosingSummary {
    let weight_kg = weight.in_kg();
    DosingSummary {
        weight_kg,
        alteplase: alteplase_dose(weight_kg),
        tenecteplase_mg: tenecteplase_dose_mg(weight_kg),
    }
}
