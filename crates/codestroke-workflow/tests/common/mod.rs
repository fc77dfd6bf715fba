#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use codestroke_core::clock::ManualClock;
use codestroke_core::dosing::BodyWeight;
use codestroke_core::models::onset::OnsetAssessment;
use codestroke_storage::kv::{KvStore, MemoryStore};
use codestroke_workflow::config::EngineConfig;
use codestroke_workflow::event::WorkflowEvent;
use codestroke_workflow::service::WorkflowService;
use jiff::{SignedDuration, Timestamp};

pub fn door() -> Timestamp {
    "2026-03-01T10:00:00Z".parse().unwrap()
}

pub fn at(minutes: i64) -> Timestamp {
    door().checked_add(SignedDuration::from_mins(minutes)).unwrap()
}

pub fn config() -> EngineConfig {
    EngineConfig {
        time_zone: "UTC".to_string(),
        ..EngineConfig::default()
    }
}

pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(door()))
}

pub fn open(clock: &Arc<ManualClock>) -> WorkflowService {
    open_with(clock, Box::new(MemoryStore::new()))
}

pub fn open_with(clock: &Arc<ManualClock>, store: Box<dyn KvStore + Send>) -> WorkflowService {
    WorkflowService::open(config(), clock.clone(), store).unwrap()
}

/// Complete stage 1 data: onset `minutes_ago` before the door time.
pub fn onset(minutes_ago: i64) -> OnsetAssessment {
    OnsetAssessment {
        last_known_well: Some(at(-minutes_ago)),
        severity_score: 8,
        systolic: 150,
        diastolic: 90,
        glucose: 110,
        weight: BodyWeight::kg(70.0),
        ..OnsetAssessment::default()
    }
}

/// Record every event the service emits.
pub fn record_events(service: &mut WorkflowService) -> Arc<Mutex<Vec<WorkflowEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    service.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
    events
}
