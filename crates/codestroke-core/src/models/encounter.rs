use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::eligibility::SavedEligibility;
use super::imaging::{ExtendedPathwayResult, ImagingAndTreatment};
use super::onset::OnsetAssessment;
use crate::milestones::MilestoneSet;

/// Workflow stages, in order. Stages compare by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Stage {
    CollectingOnset,
    CollectingImaging,
    Summarizing,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Self::CollectingOnset => Some(Self::CollectingImaging),
            Self::CollectingImaging => Some(Self::Summarizing),
            Self::Summarizing => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CollectingOnset => "Onset & vitals",
            Self::CollectingImaging => "Imaging & treatment",
            Self::Summarizing => "Documentation",
        }
    }
}

/// Everything captured for one code stroke encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Encounter {
    pub id: Uuid,
    pub stage: Stage,
    /// Furthest stage ever reached. Manual navigation may go anywhere up
    /// to here without clearing data.
    pub furthest_stage: Stage,
    pub onset: OnsetAssessment,
    pub imaging: ImagingAndTreatment,
    pub eligibility: Option<SavedEligibility>,
    pub extended_pathway: Option<ExtendedPathwayResult>,
    pub milestones: MilestoneSet,
    #[serde(default)]
    pub orders: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Encounter {
    /// A new encounter with the door anchor at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: Stage::CollectingOnset,
            furthest_stage: Stage::CollectingOnset,
            onset: OnsetAssessment::default(),
            imaging: ImagingAndTreatment::default(),
            eligibility: None,
            extended_pathway: None,
            milestones: MilestoneSet::anchored_at(now),
            orders: Vec::new(),
            recommendation: String::new(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
