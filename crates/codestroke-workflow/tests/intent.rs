mod common;

use codestroke_core::milestones::Milestone;
use codestroke_core::models::eligibility::EligibilityStatus;
use codestroke_core::models::encounter::Stage;
use codestroke_workflow::error::WorkflowError;
use codestroke_workflow::intent::{Intent, IntentOutcome, ScriptStep};

use common::{at, clock, open};

const SCRIPT: &str = r#"[
  {
    "intent": {
      "type": "set_onset",
      "onset": {
        "onset_unknown": false,
        "last_known_well": "2026-03-01T08:30:00Z",
        "discovery_override": null,
        "severity_score": 8,
        "systolic": 150,
        "diastolic": 90,
        "glucose": 110,
        "weight": { "value": 154.0, "unit": "lb" },
        "pressure_treatment_active": false,
        "low_glucose_reviewed": false
      }
    }
  },
  { "at": "2026-03-01T10:05:00Z", "intent": { "type": "complete_onset" } },
  { "intent": { "type": "record_milestone_minutes", "milestone": "first_image", "minutes": 22 } },
  {
    "at": "2026-03-01T10:30:00Z",
    "intent": {
      "type": "set_imaging",
      "imaging": {
        "result": "no_bleed",
        "agent": "tenecteplase",
        "cta_ordered": true,
        "lvo": "no",
        "minutes_to_imaging": 22,
        "minutes_to_treatment": 40
      }
    }
  },
  { "intent": { "type": "complete_imaging" } },
  { "intent": { "type": "open_eligibility" } },
  { "intent": { "type": "set_finding", "finding": "pregnancy", "selected": true } },
  { "intent": { "type": "save_eligibility" } },
  { "intent": { "type": "add_order", "order": "Neuro checks q15 min" } },
  { "at": "2026-03-01T11:00:00Z", "intent": { "type": "set_recommendation", "text": "Admit to stroke unit" } }
]"#;

#[test]
fn scripted_session_replays() {
    let clock = clock();
    let mut service = open(&clock);
    let steps: Vec<ScriptStep> = serde_json::from_str(SCRIPT).unwrap();

    let mut outcomes = Vec::new();
    for step in steps {
        if let Some(at) = step.at {
            clock.set(at);
        }
        outcomes.push(service.dispatch(step.intent).unwrap());
    }

    assert_eq!(outcomes[1], IntentOutcome::Advisories(Vec::new()));
    assert_eq!(outcomes[2], IntentOutcome::Recorded(at(22)));
    assert_eq!(
        outcomes[6],
        IntentOutcome::Eligibility(EligibilityStatus::RelativeContraindication)
    );

    let encounter = service.encounter();
    assert_eq!(encounter.stage, Stage::Summarizing);
    assert_eq!(encounter.onset.weight.in_kg(), 69.9);
    assert!(encounter.onset.discovery_same_as_lkw);
    assert_eq!(encounter.milestones.get(Milestone::DataCaptured), Some(at(5)));
    assert_eq!(encounter.milestones.get(Milestone::DrugAdministered), Some(at(40)));
    assert_eq!(
        encounter.eligibility.as_ref().map(|e| e.status),
        Some(EligibilityStatus::RelativeContraindication)
    );

    let note = service.render_note().unwrap();
    assert!(note.contains("- Dose: Tenecteplase 17.5 mg single bolus for 69.9 kg"));
    assert!(note.contains("- Door to needle: 2026-03-01 10:40 | 40 min | target 60 min PASS"));
    assert!(note.contains("Total elapsed since arrival: 1 h 0 min"));
}

#[test]
fn intents_round_trip_through_json() {
    let intent = Intent::RecordMilestone {
        milestone: Milestone::Reperfusion,
        at: Some(at(95)),
    };
    let json = serde_json::to_string(&intent).unwrap();
    assert!(json.contains(r#""type":"record_milestone""#));
    assert_eq!(serde_json::from_str::<Intent>(&json).unwrap(), intent);
}

#[test]
fn dispatch_propagates_gate_errors() {
    let clock = clock();
    let mut service = open(&clock);
    assert!(matches!(
        service.dispatch(Intent::CompleteOnset),
        Err(WorkflowError::Gate(_))
    ));
    assert!(matches!(
        service.dispatch(Intent::Navigate { stage: Stage::Summarizing }),
        Err(WorkflowError::StageNotReached(_))
    ));
}
