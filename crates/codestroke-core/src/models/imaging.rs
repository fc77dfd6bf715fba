use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ImagingResult {
    NoBleed,
    Hemorrhage,
    Other,
}

impl ImagingResult {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoBleed => "No hemorrhage",
            Self::Hemorrhage => "Intracranial hemorrhage",
            Self::Other => "Other finding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ThrombolyticAgent {
    None,
    Alteplase,
    Tenecteplase,
}

impl ThrombolyticAgent {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "No thrombolytic",
            Self::Alteplase => "Alteplase",
            Self::Tenecteplase => "Tenecteplase",
        }
    }

    pub fn is_given(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Large-vessel-occlusion finding on angiography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LvoFinding {
    #[default]
    Unset,
    Yes,
    No,
    Pending,
}

impl LvoFinding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unset => "Not assessed",
            Self::Yes => "LVO present",
            Self::No => "No LVO",
            Self::Pending => "Pending",
        }
    }
}

/// Result handed over by the separate extended-window pathway tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ExtendedPathwayResult {
    Eligible,
    NotEligible,
    Pending,
}

impl ExtendedPathwayResult {
    pub fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
            Self::NotEligible => "Not eligible",
            Self::Pending => "Pending",
        }
    }
}

/// Stage 2 data: imaging and the treatment decision.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImagingAndTreatment {
    pub result: Option<ImagingResult>,
    /// `None` until a decision is made; `Some(ThrombolyticAgent::None)` is
    /// the decision not to treat.
    pub agent: Option<ThrombolyticAgent>,
    pub cta_ordered: bool,
    #[serde(default)]
    pub lvo: LvoFinding,
    /// Door-to-imaging minutes as entered.
    pub minutes_to_imaging: Option<i64>,
    /// Door-to-needle minutes as entered.
    pub minutes_to_treatment: Option<i64>,
}

impl ImagingAndTreatment {
    pub fn agent_given(&self) -> Option<ThrombolyticAgent> {
        self.agent.filter(|a| a.is_given())
    }
}
