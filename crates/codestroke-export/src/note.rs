use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde::Serialize;

use codestroke_core::dosing;
use codestroke_core::milestones::{Milestone, MilestoneSet, MilestoneTargets, minutes_between};
use codestroke_core::models::eligibility::SavedEligibility;
use codestroke_core::models::encounter::Encounter;
use codestroke_core::models::imaging::{ExtendedPathwayResult, ImagingAndTreatment, ThrombolyticAgent};
use codestroke_core::models::onset::OnsetAssessment;
use codestroke_core::window;

use crate::format::{self, PLACEHOLDER};

/// Everything the note can draw on. Any part may be missing.
#[derive(Debug, Clone)]
pub struct NoteInput<'a> {
    pub onset: Option<&'a OnsetAssessment>,
    pub imaging: Option<&'a ImagingAndTreatment>,
    pub eligibility: Option<&'a SavedEligibility>,
    pub extended_pathway: Option<ExtendedPathwayResult>,
    pub milestones: Option<&'a MilestoneSet>,
    pub targets: &'a MilestoneTargets,
    pub orders: &'a [String],
    pub recommendation: Option<&'a str>,
    pub generated_at: Timestamp,
    pub time_zone: &'a TimeZone,
}

impl<'a> NoteInput<'a> {
    pub fn empty(targets: &'a MilestoneTargets, time_zone: &'a TimeZone, generated_at: Timestamp) -> Self {
        Self {
            onset: None,
            imaging: None,
            eligibility: None,
            extended_pathway: None,
            milestones: None,
            targets,
            orders: &[],
            recommendation: None,
            generated_at,
            time_zone,
        }
    }

    pub fn from_encounter(
        encounter: &'a Encounter,
        targets: &'a MilestoneTargets,
        time_zone: &'a TimeZone,
        generated_at: Timestamp,
    ) -> Self {
        Self {
            onset: Some(&encounter.onset),
            imaging: Some(&encounter.imaging),
            eligibility: encounter.eligibility.as_ref(),
            extended_pathway: encounter.extended_pathway,
            milestones: Some(&encounter.milestones),
            targets,
            orders: &encounter.orders,
            recommendation: Some(encounter.recommendation.as_str()),
            generated_at,
            time_zone,
        }
    }
}

/// One timed line: clock time, minutes from door, optional target badge.
#[derive(Debug, Clone, Serialize)]
pub struct TimedLine {
    pub label: String,
    pub time: String,
    pub minutes: String,
    /// Empty when the line has no target.
    pub target: String,
    pub marker: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityView {
    pub status: String,
    pub saved_at: String,
    pub elapsed_at_save: String,
    pub findings: Vec<String>,
    pub notes: String,
}

/// Fully formatted note content. Every field is already a display
/// string, so the template only lays out sections.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub generated_at: String,
    pub lkw: String,
    pub lkw_elapsed: String,
    pub window: String,
    pub discovered: String,
    pub door: String,
    pub evaluator: TimedLine,
    pub presentation: Vec<Field>,
    pub imaging_times: Vec<TimedLine>,
    pub imaging_result: String,
    pub treatment: String,
    pub dose: String,
    pub cta: String,
    pub lvo: String,
    pub extended_pathway: String,
    pub eligibility: EligibilityView,
    pub treatment_metrics: Vec<TimedLine>,
    pub procedural: Vec<TimedLine>,
    pub orders: Vec<String>,
    pub recommendation: String,
    pub total_elapsed: String,
    pub data_quality: Vec<String>,
}

impl NoteView {
    pub fn build(input: &NoteInput<'_>) -> Self {
        let empty = MilestoneSet::default();
        let milestones = input.milestones.unwrap_or(&empty);
        let tz = input.time_zone;
        let onset = input.onset.and_then(OnsetAssessment::onset);
        let onset_unknown = input.onset.is_some_and(|o| o.onset_unknown);

        let (lkw, lkw_elapsed, window) = match onset {
            Some(at) => {
                let hours = window::elapsed_hours(Some(at), input.generated_at);
                (
                    format::clock_time(Some(at), tz),
                    format::hours(Some(hours)),
                    window::classify_window(hours).label().to_string(),
                )
            }
            None if onset_unknown => (
                "Unknown".to_string(),
                PLACEHOLDER.to_string(),
                "Onset unknown".to_string(),
            ),
            None => (
                PLACEHOLDER.to_string(),
                PLACEHOLDER.to_string(),
                PLACEHOLDER.to_string(),
            ),
        };

        let line = |milestone: Milestone| milestone_line(milestones, input.targets, tz, milestone);

        Self {
            generated_at: format::clock_time(Some(input.generated_at), tz),
            lkw,
            lkw_elapsed,
            window,
            discovered: format::clock_time(input.onset.and_then(OnsetAssessment::discovered_at), tz),
            door: format::clock_time(milestones.anchor, tz),
            evaluator: line(Milestone::EvaluatorAtBedside),
            presentation: presentation(input.onset),
            imaging_times: vec![
                line(Milestone::ImagingOrdered),
                line(Milestone::FirstImage),
                line(Milestone::ImageInterpreted),
            ],
            imaging_result: format::or_placeholder(
                input.imaging.and_then(|i| i.result).map(|r| r.label()),
            ),
            treatment: format::or_placeholder(
                input.imaging.and_then(|i| i.agent).map(|a| a.label()),
            ),
            dose: dose_line(input.onset, input.imaging),
            cta: match input.imaging {
                Some(i) if i.cta_ordered => "Ordered".to_string(),
                Some(_) => "Not ordered".to_string(),
                None => PLACEHOLDER.to_string(),
            },
            lvo: format::or_placeholder(input.imaging.map(|i| i.lvo.label())),
            extended_pathway: format::or_placeholder(input.extended_pathway.map(|r| r.label())),
            eligibility: eligibility_view(input.eligibility, tz),
            treatment_metrics: vec![
                labelled(line(Milestone::DrugAdministered), "Door to needle"),
                onset_to_needle(onset, milestones, tz),
                labelled(line(Milestone::VesselAccess), "Door to arterial access"),
            ],
            procedural: vec![
                line(Milestone::VesselAccess),
                line(Milestone::DeviceDeployment),
                line(Milestone::Reperfusion),
            ],
            orders: if input.orders.is_empty() {
                vec![PLACEHOLDER.to_string()]
            } else {
                input.orders.to_vec()
            },
            recommendation: format::text(input.recommendation),
            total_elapsed: milestones
                .anchor
                .map(|door| format::duration(minutes_between(door, input.generated_at)))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            data_quality: data_quality(milestones),
        }
    }
}

fn milestone_line(
    milestones: &MilestoneSet,
    targets: &MilestoneTargets,
    tz: &TimeZone,
    milestone: Milestone,
) -> TimedLine {
    let status = milestones.status(milestone, targets);
    TimedLine {
        label: milestone.label().to_string(),
        time: format::clock_time(status.recorded_at, tz),
        minutes: format::minutes(status.minutes_from_anchor),
        target: status
            .target_minutes
            .map(|t| format!("{t} min"))
            .unwrap_or_default(),
        marker: status.badge.marker().to_string(),
    }
}

fn labelled(mut line: TimedLine, label: &str) -> TimedLine {
    line.label = label.to_string();
    line
}

fn onset_to_needle(onset: Option<Timestamp>, milestones: &MilestoneSet, tz: &TimeZone) -> TimedLine {
    let needle = milestones.get(Milestone::DrugAdministered);
    let minutes = onset.zip(needle).map(|(from, to)| minutes_between(from, to));
    TimedLine {
        label: "LKW to needle".to_string(),
        time: format::clock_time(needle, tz),
        minutes: format::minutes(minutes),
        target: String::new(),
        marker: String::new(),
    }
}

fn presentation(onset: Option<&OnsetAssessment>) -> Vec<Field> {
    let field = |label: &str, value: String| Field {
        label: label.to_string(),
        value,
    };
    let Some(o) = onset else {
        return ["Severity score", "Blood pressure", "Glucose", "Weight"]
            .into_iter()
            .map(|label| field(label, PLACEHOLDER.to_string()))
            .collect();
    };

    let pressure = if o.systolic == 0 || o.diastolic == 0 {
        PLACEHOLDER.to_string()
    } else if o.pressure_treatment_active {
        format!("{}/{} mmHg (antihypertensive treatment started)", o.systolic, o.diastolic)
    } else {
        format!("{}/{} mmHg", o.systolic, o.diastolic)
    };
    let weight_kg = o.weight.in_kg();

    vec![
        field("Severity score", format::positive(o.severity_score, "")),
        field("Blood pressure", pressure),
        field("Glucose", format::positive(o.glucose, "mg/dL")),
        field(
            "Weight",
            if weight_kg > 0.0 {
                format!("{weight_kg:.1} kg")
            } else {
                PLACEHOLDER.to_string()
            },
        ),
    ]
}

fn dose_line(onset: Option<&OnsetAssessment>, imaging: Option<&ImagingAndTreatment>) -> String {
    let agent = imaging.and_then(ImagingAndTreatment::agent_given);
    let weight_kg = onset.map(|o| o.weight.in_kg()).unwrap_or(0.0);
    if weight_kg <= 0.0 {
        return PLACEHOLDER.to_string();
    }
    match agent {
        Some(ThrombolyticAgent::Alteplase) => {
            let dose = dosing::alteplase_dose(weight_kg);
            format!(
                "Alteplase {} total (bolus {}, infusion {} over 60 min) for {weight_kg:.1} kg",
                format::mg(dose.total_mg),
                format::mg(dose.bolus_mg),
                format::mg(dose.infusion_mg),
            )
        }
        Some(ThrombolyticAgent::Tenecteplase) => format!(
            "Tenecteplase {} single bolus for {weight_kg:.1} kg",
            format::mg(dosing::tenecteplase_dose_mg(weight_kg)),
        ),
        Some(ThrombolyticAgent::None) | None => PLACEHOLDER.to_string(),
    }
}

fn eligibility_view(saved: Option<&SavedEligibility>, tz: &TimeZone) -> EligibilityView {
    let Some(saved) = saved else {
        return EligibilityView {
            status: PLACEHOLDER.to_string(),
            saved_at: PLACEHOLDER.to_string(),
            elapsed_at_save: PLACEHOLDER.to_string(),
            findings: vec![PLACEHOLDER.to_string()],
            notes: PLACEHOLDER.to_string(),
        };
    };

    let catalog = codestroke_eligibility::get_catalog(&saved.catalog);
    let label_of = |id: &String| {
        catalog
            .as_ref()
            .and_then(|c| c.finding(id).map(|f| f.label.clone()))
            .unwrap_or_else(|| id.clone())
    };

    let mut findings: Vec<String> = saved
        .selection
        .absolute
        .iter()
        .map(|id| format!("[absolute] {}", label_of(id)))
        .collect();
    if saved.window_findings_applied {
        findings.extend(
            saved
                .selection
                .window_dependent
                .iter()
                .map(|id| format!("[3-4.5 h] {}", label_of(id))),
        );
    }
    findings.extend(
        saved
            .selection
            .relative
            .iter()
            .map(|id| format!("[relative] {}", label_of(id))),
    );
    if findings.is_empty() {
        findings.push("None selected".to_string());
    }

    EligibilityView {
        status: saved.status.label().to_string(),
        saved_at: format::clock_time(Some(saved.saved_at), tz),
        elapsed_at_save: format::hours(saved.elapsed_hours_at_save),
        findings,
        notes: format::text(Some(saved.notes.as_str())),
    }
}

fn data_quality(milestones: &MilestoneSet) -> Vec<String> {
    milestones
        .out_of_order()
        .into_iter()
        .filter_map(|m| {
            milestones.minutes_from_anchor(m).map(|minutes| {
                format!(
                    "{} recorded {} before arrival; verify time",
                    m.label(),
                    format::duration(-minutes)
                )
            })
        })
        .collect()
}
