//! Stage gates and completion side effects.
//!
//! Everything here is a pure function of the encounter data and "now".
//! The service decides when to call them and applies the results.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use codestroke_core::milestones::{Milestone, MilestoneSet};
use codestroke_core::models::encounter::Stage;
use codestroke_core::models::imaging::{ImagingAndTreatment, ImagingResult, ThrombolyticAgent};
use codestroke_core::models::onset::{OnsetAssessment, PressureLimit, SEVERITY_MAX};
use codestroke_core::window;

use crate::config::{GateConfig, PressureLimits};

/// Glucose below this needs the low-glucose guidance acknowledged.
pub const LOW_GLUCOSE_MG_DL: u32 = 50;
pub const HIGH_GLUCOSE_MG_DL: u32 = 400;

/// One reason a stage cannot complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "issue", rename_all = "snake_case")]
#[ts(export)]
pub enum GateIssue {
    MissingOnset,
    /// Onset is set but no time has elapsed since it.
    OnsetNotElapsed,
    MissingSeverity,
    MissingSystolic,
    MissingDiastolic,
    MissingGlucose,
    MissingWeight,
    PressureUntreated {
        systolic: u32,
        diastolic: u32,
        limit: PressureLimit,
    },
    MissingImagingResult,
    MissingMinutesToImaging,
    MissingTreatmentDecision,
    AgentRequiresNoBleed {
        agent: ThrombolyticAgent,
    },
}

impl std::fmt::Display for GateIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOnset => f.write_str("last known well time is required unless onset is unknown"),
            Self::OnsetNotElapsed => f.write_str("last known well must be in the past"),
            Self::MissingSeverity => f.write_str("severity score is required"),
            Self::MissingSystolic => f.write_str("systolic pressure is required"),
            Self::MissingDiastolic => f.write_str("diastolic pressure is required"),
            Self::MissingGlucose => f.write_str("glucose is required"),
            Self::MissingWeight => f.write_str("weight is required"),
            Self::PressureUntreated {
                systolic,
                diastolic,
                limit,
            } => write!(
                f,
                "pressure {systolic}/{diastolic} exceeds {}/{}; start antihypertensive treatment",
                limit.systolic, limit.diastolic
            ),
            Self::MissingImagingResult => f.write_str("imaging result is required"),
            Self::MissingMinutesToImaging => f.write_str("minutes to imaging is required"),
            Self::MissingTreatmentDecision => {
                f.write_str("a treatment decision (including none) is required")
            }
            Self::AgentRequiresNoBleed { agent } => {
                write!(f, "{} requires imaging without hemorrhage", agent.label())
            }
        }
    }
}

/// A stage could not complete. Lists every issue, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} incomplete: {}", .stage.label(), join_issues(.issues))]
pub struct StageGateError {
    pub stage: Stage,
    pub issues: Vec<GateIssue>,
}

fn join_issues(issues: &[GateIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl StageGateError {
    pub fn has(&self, issue: &GateIssue) -> bool {
        self.issues.contains(issue)
    }
}

/// Non-blocking warnings raised when stage 1 completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "advisory", rename_all = "snake_case")]
#[ts(export)]
pub enum Advisory {
    LowGlucoseNotReviewed { glucose: u32 },
    HighGlucose { glucose: u32 },
    SeverityOutOfRange { score: u32 },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowGlucoseNotReviewed { glucose } => write!(
                f,
                "glucose {glucose} mg/dL: correct hypoglycemia and reassess deficits"
            ),
            Self::HighGlucose { glucose } => {
                write!(f, "glucose {glucose} mg/dL is above {HIGH_GLUCOSE_MG_DL}")
            }
            Self::SeverityOutOfRange { score } => {
                write!(f, "severity score {score} is outside 0-{SEVERITY_MAX}")
            }
        }
    }
}

/// Pressure ceiling for the current onset. Unknown onset uses the
/// reperfusion ceiling.
pub fn pressure_limit_for(onset: Option<Timestamp>, now: Timestamp, limits: &PressureLimits) -> PressureLimit {
    match onset {
        Some(at) => {
            let hours = window::elapsed_hours(Some(at), now);
            if window::classify_window(hours) == window::TreatmentWindow::Outside {
                limits.permissive
            } else {
                limits.reperfusion
            }
        }
        None => limits.reperfusion,
    }
}

pub fn check_onset_gate(
    onset: &OnsetAssessment,
    now: Timestamp,
    limits: &PressureLimits,
    gates: &GateConfig,
) -> Result<(), StageGateError> {
    let mut issues = Vec::new();

    if !onset.onset_unknown {
        match onset.last_known_well {
            None => issues.push(GateIssue::MissingOnset),
            Some(lkw) if lkw >= now => issues.push(GateIssue::OnsetNotElapsed),
            Some(_) => {}
        }
    }
    if onset.severity_score == 0 {
        issues.push(GateIssue::MissingSeverity);
    }
    if onset.systolic == 0 {
        issues.push(GateIssue::MissingSystolic);
    }
    if onset.diastolic == 0 {
        issues.push(GateIssue::MissingDiastolic);
    }
    if onset.glucose == 0 {
        issues.push(GateIssue::MissingGlucose);
    }
    if !onset.weight.is_positive() {
        issues.push(GateIssue::MissingWeight);
    }

    let limit = pressure_limit_for(onset.onset(), now, limits);
    let exempt = onset.onset_unknown && !gates.require_pressure_ack_when_onset_unknown;
    if limit.exceeded_by(onset.systolic, onset.diastolic)
        && !onset.pressure_treatment_active
        && !exempt
    {
        issues.push(GateIssue::PressureUntreated {
            systolic: onset.systolic,
            diastolic: onset.diastolic,
            limit,
        });
    }

    gate_result(Stage::CollectingOnset, issues)
}

pub fn check_imaging_gate(imaging: &ImagingAndTreatment) -> Result<(), StageGateError> {
    let mut issues = Vec::new();

    match imaging.result {
        None => issues.push(GateIssue::MissingImagingResult),
        Some(ImagingResult::NoBleed) => {
            if imaging.agent.is_none() {
                issues.push(GateIssue::MissingTreatmentDecision);
            }
        }
        Some(_) => {
            if let Some(agent) = imaging.agent_given() {
                issues.push(GateIssue::AgentRequiresNoBleed { agent });
            }
        }
    }
    if imaging.minutes_to_imaging.is_none() {
        issues.push(GateIssue::MissingMinutesToImaging);
    }

    gate_result(Stage::CollectingImaging, issues)
}

fn gate_result(stage: Stage, issues: Vec<GateIssue>) -> Result<(), StageGateError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(StageGateError { stage, issues })
    }
}

pub fn onset_advisories(onset: &OnsetAssessment) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if onset.glucose > 0 && onset.glucose < LOW_GLUCOSE_MG_DL && !onset.low_glucose_reviewed {
        advisories.push(Advisory::LowGlucoseNotReviewed {
            glucose: onset.glucose,
        });
    }
    if onset.glucose > HIGH_GLUCOSE_MG_DL {
        advisories.push(Advisory::HighGlucose {
            glucose: onset.glucose,
        });
    }
    if onset.severity_score > SEVERITY_MAX {
        advisories.push(Advisory::SeverityOutOfRange {
            score: onset.severity_score,
        });
    }
    advisories
}

/// Milestones written by completing stage 1. Returns what was written.
pub fn stamp_onset_milestones(milestones: &mut MilestoneSet, now: Timestamp) -> Vec<(Milestone, Timestamp)> {
    if milestones.record_if_absent(Milestone::DataCaptured, now) {
        vec![(Milestone::DataCaptured, now)]
    } else {
        Vec::new()
    }
}

/// Milestones written by completing stage 2, back-computed from the
/// anchor. A directly captured first image is kept, but one stamped by an
/// earlier completion follows the corrected minutes. The entered
/// door-to-needle minutes always win for the drug milestone.
pub fn stamp_imaging_milestones(
    milestones: &mut MilestoneSet,
    imaging: &ImagingAndTreatment,
) -> Vec<(Milestone, Timestamp)> {
    let mut written = Vec::new();

    if let Some(at) = imaging
        .minutes_to_imaging
        .and_then(|m| milestones.at_minutes_from_anchor(m))
    {
        if milestones.get(Milestone::FirstImage) != Some(at)
            && milestones.record_derived(Milestone::FirstImage, at)
        {
            written.push((Milestone::FirstImage, at));
        }
    }

    if imaging.agent_given().is_some() {
        if let Some(at) = imaging
            .minutes_to_treatment
            .and_then(|m| milestones.at_minutes_from_anchor(m))
        {
            milestones.record(Milestone::DrugAdministered, at);
            written.push((Milestone::DrugAdministered, at));
        }
    }

    written
}
