//! Door-anchored quality milestones.
//!
//! A [`MilestoneSet`] maps each named event to an optional timestamp and
//! measures it against a single anchor (door time). Values earlier than
//! the anchor are kept as entered and flagged; nothing here clamps or
//! rejects a clinician's timestamp.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Milestone {
    DataCaptured,
    EvaluatorAtBedside,
    ImagingOrdered,
    FirstImage,
    ImageInterpreted,
    DrugAdministered,
    VesselAccess,
    DeviceDeployment,
    Reperfusion,
}

impl Milestone {
    /// Chronological display order.
    pub const ALL: [Milestone; 9] = [
        Milestone::DataCaptured,
        Milestone::EvaluatorAtBedside,
        Milestone::ImagingOrdered,
        Milestone::FirstImage,
        Milestone::ImageInterpreted,
        Milestone::DrugAdministered,
        Milestone::VesselAccess,
        Milestone::DeviceDeployment,
        Milestone::Reperfusion,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::DataCaptured => "data_captured",
            Self::EvaluatorAtBedside => "evaluator_at_bedside",
            Self::ImagingOrdered => "imaging_ordered",
            Self::FirstImage => "first_image",
            Self::ImageInterpreted => "image_interpreted",
            Self::DrugAdministered => "drug_administered",
            Self::VesselAccess => "vessel_access",
            Self::DeviceDeployment => "device_deployment",
            Self::Reperfusion => "reperfusion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DataCaptured => "Initial data captured",
            Self::EvaluatorAtBedside => "Stroke team at bedside",
            Self::ImagingOrdered => "Imaging ordered",
            Self::FirstImage => "First image acquired",
            Self::ImageInterpreted => "Imaging interpreted",
            Self::DrugAdministered => "Thrombolytic administered",
            Self::VesselAccess => "Arterial access",
            Self::DeviceDeployment => "Device deployed",
            Self::Reperfusion => "Reperfusion",
        }
    }

    /// Procedural (thrombectomy) events.
    pub fn is_procedural(self) -> bool {
        matches!(
            self,
            Self::VesselAccess | Self::DeviceDeployment | Self::Reperfusion
        )
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Milestone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Milestone::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| CoreError::UnknownMilestone(s.to_string()))
    }
}

/// Door-to-event targets, in minutes. A missing entry means "no target".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MilestoneTargets {
    pub minutes: BTreeMap<Milestone, i64>,
}

impl MilestoneTargets {
    pub fn target(&self, milestone: Milestone) -> Option<i64> {
        self.minutes.get(&milestone).copied()
    }
}

impl Default for MilestoneTargets {
    fn default() -> Self {
        let minutes = BTreeMap::from([
            (Milestone::EvaluatorAtBedside, 15),
            (Milestone::FirstImage, 25),
            (Milestone::ImageInterpreted, 45),
            (Milestone::DrugAdministered, 60),
            (Milestone::VesselAccess, 90),
            (Milestone::Reperfusion, 120),
        ]);
        Self { minutes }
    }
}

/// Presentation badge for one milestone against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TargetBadge {
    Met,
    Missed,
    /// Target exists but the milestone (or the anchor) is not recorded yet.
    Pending,
    NoTarget,
}

impl TargetBadge {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Met => "PASS",
            Self::Missed => "FAIL",
            Self::Pending => "PENDING",
            Self::NoTarget => "",
        }
    }
}

/// Derived view of one milestone. Computed on read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MilestoneStatus {
    pub milestone: Milestone,
    pub recorded_at: Option<Timestamp>,
    pub minutes_from_anchor: Option<i64>,
    pub target_minutes: Option<i64>,
    pub badge: TargetBadge,
    /// Recorded before the anchor. Surfaced as a data-quality warning.
    pub out_of_order: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MilestoneSet {
    pub anchor: Option<Timestamp>,
    #[serde(default)]
    pub recorded: BTreeMap<Milestone, Timestamp>,
    /// Milestones back-computed from entered minutes rather than captured.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub derived: BTreeSet<Milestone>,
}

impl MilestoneSet {
    /// A fresh set anchored at `door`.
    pub fn anchored_at(door: Timestamp) -> Self {
        Self {
            anchor: Some(door),
            recorded: BTreeMap::new(),
            derived: BTreeSet::new(),
        }
    }

    pub fn set_anchor(&mut self, anchor: Option<Timestamp>) {
        self.anchor = anchor;
    }

    /// Upsert. Recording twice keeps the later call.
    pub fn record(&mut self, milestone: Milestone, at: Timestamp) {
        self.derived.remove(&milestone);
        self.recorded.insert(milestone, at);
    }

    /// Record a back-computed value. A directly captured value is kept;
    /// an earlier back-computed one is replaced. Returns whether it wrote.
    pub fn record_derived(&mut self, milestone: Milestone, at: Timestamp) -> bool {
        if self.recorded.contains_key(&milestone) && !self.derived.contains(&milestone) {
            return false;
        }
        self.recorded.insert(milestone, at);
        self.derived.insert(milestone);
        true
    }

    pub fn is_derived(&self, milestone: Milestone) -> bool {
        self.derived.contains(&milestone)
    }

    /// Record only if nothing is recorded yet. Returns whether it wrote.
    pub fn record_if_absent(&mut self, milestone: Milestone, at: Timestamp) -> bool {
        if self.recorded.contains_key(&milestone) {
            return false;
        }
        self.recorded.insert(milestone, at);
        true
    }

    pub fn clear(&mut self, milestone: Milestone) -> Option<Timestamp> {
        self.derived.remove(&milestone);
        self.recorded.remove(&milestone)
    }

    /// Drop every recorded milestone. The anchor stays.
    pub fn clear_all(&mut self) {
        self.recorded.clear();
        self.derived.clear();
    }

    pub fn get(&self, milestone: Milestone) -> Option<Timestamp> {
        self.recorded.get(&milestone).copied()
    }

    /// Whole minutes from the anchor, rounded to nearest. Negative when the
    /// milestone predates the anchor.
    pub fn minutes_from_anchor(&self, milestone: Milestone) -> Option<i64> {
        let anchor = self.anchor?;
        let at = self.get(milestone)?;
        Some(minutes_between(anchor, at))
    }

    /// Absolute timestamp `minutes` after the anchor.
    pub fn at_minutes_from_anchor(&self, minutes: i64) -> Option<Timestamp> {
        let anchor = self.anchor?;
        anchor.checked_add(SignedDuration::from_mins(minutes)).ok()
    }

    pub fn status(&self, milestone: Milestone, targets: &MilestoneTargets) -> MilestoneStatus {
        let minutes = self.minutes_from_anchor(milestone);
        let target = targets.target(milestone);
        let badge = match (target, minutes) {
            (None, _) => TargetBadge::NoTarget,
            (Some(_), None) => TargetBadge::Pending,
            (Some(limit), Some(m)) if m <= limit => TargetBadge::Met,
            (Some(_), Some(_)) => TargetBadge::Missed,
        };
        MilestoneStatus {
            milestone,
            recorded_at: self.get(milestone),
            minutes_from_anchor: minutes,
            target_minutes: target,
            badge,
            out_of_order: minutes.is_some_and(|m| m < 0),
        }
    }

    /// Status of every milestone in display order.
    pub fn statuses(&self, targets: &MilestoneTargets) -> Vec<MilestoneStatus> {
        Milestone::ALL
            .into_iter()
            .map(|m| self.status(m, targets))
            .collect()
    }

    /// Milestones recorded before the anchor.
    pub fn out_of_order(&self) -> Vec<Milestone> {
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };
        self.recorded
            .iter()
            .filter(|(_, at)| **at < anchor)
            .map(|(m, _)| *m)
            .collect()
    }
}

/// Signed minutes from `from` to `to`, rounded half away from zero.
pub fn minutes_between(from: Timestamp, to: Timestamp) -> i64 {
    let millis = to.as_millisecond() - from.as_millisecond();
    (millis as f64 / MILLIS_PER_MINUTE).round() as i64
}
