use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How strongly a finding weighs against thrombolysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FindingTier {
    Absolute,
    Relative,
    /// Forbids therapy only in the 3-4.5 h sub-window.
    WindowDependent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EligibilityStatus {
    AbsoluteContraindication,
    RelativeContraindication,
    NoContraindicationsFlagged,
}

impl EligibilityStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::AbsoluteContraindication => "Absolute contraindication",
            Self::RelativeContraindication => "Relative contraindication - weigh risk/benefit",
            Self::NoContraindicationsFlagged => "No contraindications flagged",
        }
    }
}

/// Toggled finding ids, one set per tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FindingSelection {
    #[serde(default)]
    pub absolute: BTreeSet<String>,
    #[serde(default)]
    pub relative: BTreeSet<String>,
    #[serde(default)]
    pub window_dependent: BTreeSet<String>,
}

impl FindingSelection {
    pub fn tier_mut(&mut self, tier: FindingTier) -> &mut BTreeSet<String> {
        match tier {
            FindingTier::Absolute => &mut self.absolute,
            FindingTier::Relative => &mut self.relative,
            FindingTier::WindowDependent => &mut self.window_dependent,
        }
    }

    pub fn tier(&self, tier: FindingTier) -> &BTreeSet<String> {
        match tier {
            FindingTier::Absolute => &self.absolute,
            FindingTier::Relative => &self.relative,
            FindingTier::WindowDependent => &self.window_dependent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.absolute.is_empty() && self.relative.is_empty() && self.window_dependent.is_empty()
    }
}

/// A finalized eligibility review: what was known and decided at save
/// time. Nothing in here tracks the live clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SavedEligibility {
    /// Catalog the finding ids belong to.
    pub catalog: String,
    pub status: EligibilityStatus,
    pub selection: FindingSelection,
    /// Whether window-dependent findings counted at save time.
    pub window_findings_applied: bool,
    pub onset: Option<Timestamp>,
    /// Frozen copy of the elapsed onset hours. `None` when onset was absent.
    pub elapsed_hours_at_save: Option<f64>,
    pub notes: String,
    pub saved_at: Timestamp,
}
