use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use codestroke_core::milestones::Milestone;
use codestroke_core::models::encounter::Stage;
use codestroke_core::window::TreatmentWindow;

/// Snapshot of the live, clock-derived values. Recomputed on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LiveStatus {
    pub now: Timestamp,
    pub stage: Stage,
    /// `None` when onset is unknown or not yet entered.
    pub elapsed_hours: Option<f64>,
    pub window: Option<TreatmentWindow>,
    pub minutes_since_arrival: Option<i64>,
    pub window_findings_active: bool,
}

/// Everything observers can hear about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", rename_all = "snake_case")]
#[ts(export)]
pub enum WorkflowEvent {
    StageCompleted { from: Stage, to: Stage },
    StageEntered { stage: Stage },
    MilestoneRecorded { milestone: Milestone, at: Timestamp },
    MilestoneCleared { milestone: Milestone },
    Tick { status: LiveStatus },
    /// Transient, non-fatal message for the clinician.
    Notice { message: String },
    Reset { encounter_id: Uuid },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
