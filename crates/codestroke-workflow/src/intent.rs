use jiff::{Timestamp, civil};
use serde::{Deserialize, Serialize};

use codestroke_core::milestones::Milestone;
use codestroke_core::models::eligibility::{EligibilityStatus, SavedEligibility};
use codestroke_core::models::encounter::Stage;
use codestroke_core::models::imaging::{ExtendedPathwayResult, ImagingAndTreatment};
use codestroke_core::models::onset::OnsetAssessment;

use crate::error::WorkflowError;
use crate::service::WorkflowService;
use crate::transition::Advisory;

/// A serialized UI action. Hosts that cannot call the service directly
/// send these through [`WorkflowService::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    SetOnset { onset: OnsetAssessment },
    SetLastKnownWellClock { time: civil::Time },
    CompleteOnset,
    SetImaging { imaging: ImagingAndTreatment },
    CompleteImaging,
    SetExtendedPathway { result: Option<ExtendedPathwayResult> },
    Navigate { stage: Stage },
    OpenEligibility,
    SetFinding { finding: String, selected: bool },
    SetEligibilityNotes { notes: String },
    SaveEligibility,
    DiscardEligibility,
    RecordMilestone {
        milestone: Milestone,
        #[serde(default)]
        at: Option<Timestamp>,
    },
    RecordMilestoneMinutes { milestone: Milestone, minutes: i64 },
    ClearMilestone { milestone: Milestone },
    SetAnchor { at: Option<Timestamp> },
    AddOrder { order: String },
    RemoveOrder { index: usize },
    SetRecommendation { text: String },
    Reset,
}

/// What a dispatched intent produced, beyond the state change itself.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Done,
    Advisories(Vec<Advisory>),
    Eligibility(EligibilityStatus),
    EligibilitySaved(SavedEligibility),
    Recorded(Timestamp),
}

/// One step of a scripted session: an optional clock setting, then the
/// intent to apply at that time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub at: Option<Timestamp>,
    pub intent: Intent,
}

impl WorkflowService {
    pub fn dispatch(&mut self, intent: Intent) -> Result<IntentOutcome, WorkflowError> {
        let outcome = match intent {
            Intent::SetOnset { onset } => {
                self.set_onset(onset)?;
                IntentOutcome::Done
            }
            Intent::SetLastKnownWellClock { time } => {
                IntentOutcome::Recorded(self.set_last_known_well_clock(time)?)
            }
            Intent::CompleteOnset => IntentOutcome::Advisories(self.complete_onset()?),
            Intent::SetImaging { imaging } => {
                self.set_imaging(imaging)?;
                IntentOutcome::Done
            }
            Intent::CompleteImaging => {
                self.complete_imaging()?;
                IntentOutcome::Done
            }
            Intent::SetExtendedPathway { result } => {
                self.set_extended_pathway(result);
                IntentOutcome::Done
            }
            Intent::Navigate { stage } => {
                self.navigate(stage)?;
                IntentOutcome::Done
            }
            Intent::OpenEligibility => {
                let now = self.now();
                IntentOutcome::Eligibility(self.open_eligibility()?.status(now))
            }
            Intent::SetFinding { finding, selected } => {
                IntentOutcome::Eligibility(self.set_finding(&finding, selected)?)
            }
            Intent::SetEligibilityNotes { notes } => {
                self.set_eligibility_notes(notes)?;
                IntentOutcome::Done
            }
            Intent::SaveEligibility => IntentOutcome::EligibilitySaved(self.save_eligibility()?),
            Intent::DiscardEligibility => {
                self.discard_eligibility();
                IntentOutcome::Done
            }
            Intent::RecordMilestone { milestone, at } => {
                IntentOutcome::Recorded(self.record_milestone(milestone, at))
            }
            Intent::RecordMilestoneMinutes { milestone, minutes } => {
                IntentOutcome::Recorded(self.record_milestone_minutes(milestone, minutes)?)
            }
            Intent::ClearMilestone { milestone } => {
                self.clear_milestone(milestone);
                IntentOutcome::Done
            }
            Intent::SetAnchor { at } => {
                self.set_anchor(at);
                IntentOutcome::Done
            }
            Intent::AddOrder { order } => {
                self.add_order(order);
                IntentOutcome::Done
            }
            Intent::RemoveOrder { index } => {
                self.remove_order(index)?;
                IntentOutcome::Done
            }
            Intent::SetRecommendation { text } => {
                self.set_recommendation(text);
                IntentOutcome::Done
            }
            Intent::Reset => {
                self.reset();
                IntentOutcome::Done
            }
        };
        Ok(outcome)
    }
}
