use std::path::Path;
use std::sync::Arc;

use jiff::Timestamp;

use codestroke_core::clock::ManualClock;
use codestroke_storage::kv::MemoryStore;
use codestroke_workflow::config::EngineConfig;
use codestroke_workflow::intent::{IntentOutcome, ScriptStep};
use codestroke_workflow::service::WorkflowService;

use super::print_notices;

/// Replays never touch the stored session; they run against memory with
/// a clock driven by the script's `at` fields.
pub fn run(config: EngineConfig, script: &Path, print_note: bool) -> eyre::Result<()> {
    let contents = std::fs::read_to_string(script)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", script.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&contents)?;

    let start = steps.iter().find_map(|s| s.at).unwrap_or_else(Timestamp::now);
    let clock = Arc::new(ManualClock::new(start));
    let mut service = WorkflowService::open(config, clock.clone(), Box::new(MemoryStore::new()))?;
    service.subscribe(print_notices);

    let mut rejected = 0usize;
    for (i, step) in steps.into_iter().enumerate() {
        if let Some(at) = step.at {
            clock.set(at);
        }
        let label = format!("{:?}", step.intent);
        match service.dispatch(step.intent) {
            Ok(outcome) => println!("{:>3}. {} -> {}", i + 1, short(&label), describe(&outcome)),
            Err(e) => {
                rejected += 1;
                println!("{:>3}. {} -> rejected: {e}", i + 1, short(&label));
            }
        }
    }

    println!(
        "stage: {}, rejected steps: {rejected}",
        service.stage().label()
    );
    if print_note {
        println!();
        print!("{}", service.render_note()?);
    }
    Ok(())
}

fn short(label: &str) -> &str {
    label.split([' ', '{']).next().unwrap_or(label)
}

fn describe(outcome: &IntentOutcome) -> String {
    match outcome {
        IntentOutcome::Done => "ok".to_string(),
        IntentOutcome::Advisories(a) if a.is_empty() => "ok".to_string(),
        IntentOutcome::Advisories(a) => a
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
        IntentOutcome::Eligibility(status) => status.label().to_string(),
        IntentOutcome::EligibilitySaved(saved) => format!("saved: {}", saved.status.label()),
        IntentOutcome::Recorded(at) => format!("recorded {at}"),
    }
}
