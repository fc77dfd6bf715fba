use std::collections::BTreeSet;

use codestroke_core::dosing::BodyWeight;
use codestroke_core::milestones::{Milestone, MilestoneTargets};
use codestroke_core::models::eligibility::{EligibilityStatus, FindingSelection, SavedEligibility};
use codestroke_core::models::encounter::Encounter;
use codestroke_core::models::imaging::{ImagingResult, LvoFinding, ThrombolyticAgent};
use codestroke_export::format::PLACEHOLDER;
use codestroke_export::note::{NoteInput, NoteView};
use codestroke_export::render::{render_note, render_with};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

fn door() -> Timestamp {
    "2026-03-01T10:00:00Z".parse().unwrap()
}

fn at(minutes: i64) -> Timestamp {
    door().checked_add(SignedDuration::from_mins(minutes)).unwrap()
}

fn treated_encounter() -> Encounter {
    let mut e = Encounter::new(door());
    e.onset.last_known_well = Some(at(-90));
    e.onset.severity_score = 12;
    e.onset.systolic = 150;
    e.onset.diastolic = 90;
    e.onset.glucose = 110;
    e.onset.weight = BodyWeight::kg(70.0);
    e.imaging.result = Some(ImagingResult::NoBleed);
    e.imaging.agent = Some(ThrombolyticAgent::Alteplase);
    e.imaging.lvo = LvoFinding::No;
    e.milestones.record(Milestone::FirstImage, at(22));
    e.milestones.record(Milestone::ImageInterpreted, at(50));
    e.milestones.record(Milestone::DrugAdministered, at(45));
    e.orders = vec!["Neuro checks q15 min".to_string()];
    e.recommendation = "Admit to stroke unit".to_string();
    e
}

#[test]
fn empty_note_renders_every_section_with_placeholders() {
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let note = render_note(&NoteInput::empty(&targets, &tz, door())).unwrap();

    for header in [
        "ONSET",
        "ARRIVAL",
        "PRESENTATION",
        "IMAGING",
        "TREATMENT",
        "ELIGIBILITY",
        "TREATMENT METRICS",
        "PROCEDURAL",
        "ORDERS",
        "RECOMMENDATION",
    ] {
        assert!(note.contains(&format!("\n{header}\n")), "missing section {header}");
    }
    assert!(note.contains(&format!("- Last known well: {PLACEHOLDER}")));
    assert!(note.contains(&format!("- Door: {PLACEHOLDER}")));
    assert!(note.contains(&format!("- Severity score: {PLACEHOLDER}")));
    assert!(note.contains(&format!("- Dose: {PLACEHOLDER}")));
    assert!(note.contains(&format!("- Status: {PLACEHOLDER}")));
    assert!(note.contains(&format!("Total elapsed since arrival: {PLACEHOLDER}")));
    assert!(!note.contains("DATA QUALITY"));
}

#[test]
fn sections_appear_in_fixed_order() {
    let encounter = treated_encounter();
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let note = render_note(&NoteInput::from_encounter(&encounter, &targets, &tz, at(70))).unwrap();

    let positions: Vec<usize> = [
        "\nONSET\n",
        "\nARRIVAL\n",
        "\nPRESENTATION\n",
        "\nIMAGING\n",
        "\nTREATMENT\n",
        "\nELIGIBILITY\n",
        "\nTREATMENT METRICS\n",
        "\nPROCEDURAL\n",
        "\nORDERS\n",
        "\nRECOMMENDATION\n",
        "Total elapsed since arrival",
    ]
    .iter()
    .map(|h| note.find(h).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn imaging_badges_against_targets() {
    let encounter = treated_encounter();
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let note = render_note(&NoteInput::from_encounter(&encounter, &targets, &tz, at(70))).unwrap();

    assert!(note.contains("- First image acquired: 2026-03-01 10:22 | 22 min | target 25 min PASS"));
    assert!(note.contains("- Imaging interpreted: 2026-03-01 10:50 | 50 min | target 45 min FAIL"));
    assert!(note.contains("- Door to needle: 2026-03-01 10:45 | 45 min | target 60 min PASS"));
    assert!(note.contains("- LKW to needle: 2026-03-01 10:45 | 135 min\n"));
    assert!(note.contains(&format!("- Imaging ordered: {PLACEHOLDER} | {PLACEHOLDER}\n")));
}

#[test]
fn presentation_dose_and_totals() {
    let encounter = treated_encounter();
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let note = render_note(&NoteInput::from_encounter(&encounter, &targets, &tz, at(75))).unwrap();

    assert!(note.contains("- Blood pressure: 150/90 mmHg\n"));
    assert!(note.contains("- Glucose: 110 mg/dL"));
    assert!(note.contains("- Weight: 70.0 kg"));
    assert!(note.contains(
        "- Dose: Alteplase 63.0 mg total (bolus 6.3 mg, infusion 56.7 mg over 60 min) for 70.0 kg"
    ));
    assert!(note.contains("- Result: No hemorrhage"));
    assert!(note.contains("- Large vessel occlusion: No LVO"));
    assert!(note.contains("- Neuro checks q15 min"));
    assert!(note.contains("Admit to stroke unit"));
    assert!(note.contains("Total elapsed since arrival: 1 h 15 min"));
    assert!(note.contains("- Treatment window: Within 4.5 h (standard)"));
}

#[test]
fn tenecteplase_dose_line() {
    let mut encounter = treated_encounter();
    encounter.imaging.agent = Some(ThrombolyticAgent::Tenecteplase);
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let view = NoteView::build(&NoteInput::from_encounter(&encounter, &targets, &tz, at(60)));
    assert_eq!(view.dose, "Tenecteplase 20.0 mg single bolus for 70.0 kg");
}

#[test]
fn declined_treatment_has_no_dose() {
    let mut encounter = treated_encounter();
    encounter.imaging.agent = Some(ThrombolyticAgent::None);
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let view = NoteView::build(&NoteInput::from_encounter(&encounter, &targets, &tz, at(60)));
    assert_eq!(view.dose, PLACEHOLDER);
    assert_eq!(view.treatment, "No thrombolytic");
}

#[test]
fn eligibility_lists_finding_labels() {
    let mut encounter = treated_encounter();
    encounter.eligibility = Some(SavedEligibility {
        catalog: "thrombolysis".to_string(),
        status: EligibilityStatus::AbsoluteContraindication,
        selection: FindingSelection {
            absolute: BTreeSet::from(["ich_on_imaging".to_string()]),
            relative: BTreeSet::from(["pregnancy".to_string()]),
            window_dependent: BTreeSet::from(["age_over_80".to_string()]),
        },
        window_findings_applied: false,
        onset: Some(at(-90)),
        elapsed_hours_at_save: Some(1.74),
        notes: "  ".to_string(),
        saved_at: at(30),
    });
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let view = NoteView::build(&NoteInput::from_encounter(&encounter, &targets, &tz, at(60)));

    assert_eq!(view.eligibility.status, "Absolute contraindication");
    assert_eq!(view.eligibility.elapsed_at_save, "1.7 h");
    assert_eq!(view.eligibility.notes, PLACEHOLDER);
    assert_eq!(
        view.eligibility.findings,
        vec![
            "[absolute] Intracranial hemorrhage on imaging".to_string(),
            "[relative] Pregnancy or early postpartum".to_string(),
        ]
    );
}

#[test]
fn milestone_before_arrival_is_flagged() {
    let mut encounter = treated_encounter();
    encounter.milestones.record(Milestone::ImagingOrdered, at(-12));
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let note = render_note(&NoteInput::from_encounter(&encounter, &targets, &tz, at(60))).unwrap();

    assert!(note.contains("- Imaging ordered: 2026-03-01 09:48 | -12 min"));
    assert!(note.contains("DATA QUALITY\n- Imaging ordered recorded 12 min before arrival; verify time"));
}

#[test]
fn unknown_onset_is_stated() {
    let mut encounter = treated_encounter();
    encounter.onset.onset_unknown = true;
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let view = NoteView::build(&NoteInput::from_encounter(&encounter, &targets, &tz, at(60)));
    assert_eq!(view.lkw, "Unknown");
    assert_eq!(view.window, "Onset unknown");
}

#[test]
fn custom_template_sees_the_view() {
    let encounter = treated_encounter();
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let input = NoteInput::from_encounter(&encounter, &targets, &tz, at(60));
    let out = render_with("short.txt", "{{ door }} / {{ treatment }}", &input).unwrap();
    assert_eq!(out, "2026-03-01 10:00 / Alteplase");
}

#[test]
fn bad_template_is_a_parse_error() {
    let targets = MilestoneTargets::default();
    let tz = TimeZone::UTC;
    let input = NoteInput::empty(&targets, &tz, door());
    let err = render_with("bad.txt", "{% if %}", &input).unwrap_err();
    assert!(err.to_string().contains("template parse error"));
}
