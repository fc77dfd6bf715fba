use codestroke_core::milestones::{Milestone, MilestoneSet, MilestoneTargets, TargetBadge};
use jiff::{SignedDuration, Timestamp};

fn door() -> Timestamp {
    "2026-03-01T08:00:00Z".parse().unwrap()
}

fn after(minutes: i64) -> Timestamp {
    door().checked_add(SignedDuration::from_mins(minutes)).unwrap()
}

#[test]
fn unset_anchor_or_milestone_yields_none() {
    let mut set = MilestoneSet::default();
    set.record(Milestone::FirstImage, after(5));
    assert_eq!(set.minutes_from_anchor(Milestone::FirstImage), None);

    let set = MilestoneSet::anchored_at(door());
    assert_eq!(set.minutes_from_anchor(Milestone::FirstImage), None);
}

#[test]
fn minutes_round_trip_through_the_anchor() {
    let mut set = MilestoneSet::anchored_at(door());
    for delta in [-30_i64, -1, 0, 1, 7, 25, 45, 61, 240] {
        set.record(Milestone::Reperfusion, after(delta));
        assert_eq!(set.minutes_from_anchor(Milestone::Reperfusion), Some(delta));
    }
}

#[test]
fn seconds_round_to_nearest_minute() {
    let mut set = MilestoneSet::anchored_at(door());
    let at = door().checked_add(SignedDuration::from_secs(10 * 60 + 29)).unwrap();
    set.record(Milestone::ImagingOrdered, at);
    assert_eq!(set.minutes_from_anchor(Milestone::ImagingOrdered), Some(10));

    let at = door().checked_add(SignedDuration::from_secs(10 * 60 + 31)).unwrap();
    set.record(Milestone::ImagingOrdered, at);
    assert_eq!(set.minutes_from_anchor(Milestone::ImagingOrdered), Some(11));
}

#[test]
fn recording_twice_overwrites() {
    let mut set = MilestoneSet::anchored_at(door());
    set.record(Milestone::FirstImage, after(30));
    set.record(Milestone::FirstImage, after(20));
    assert_eq!(set.get(Milestone::FirstImage), Some(after(20)));
}

#[test]
fn record_if_absent_keeps_the_first_value() {
    let mut set = MilestoneSet::anchored_at(door());
    assert!(set.record_if_absent(Milestone::DataCaptured, after(3)));
    assert!(!set.record_if_absent(Milestone::DataCaptured, after(9)));
    assert_eq!(set.minutes_from_anchor(Milestone::DataCaptured), Some(3));
}

#[test]
fn derived_values_yield_to_captured_ones() {
    let mut set = MilestoneSet::anchored_at(door());
    assert!(set.record_derived(Milestone::FirstImage, after(40)));
    assert!(set.is_derived(Milestone::FirstImage));

    // A later back-computation replaces an earlier one.
    assert!(set.record_derived(Milestone::FirstImage, after(20)));
    assert_eq!(set.minutes_from_anchor(Milestone::FirstImage), Some(20));

    // A direct capture wins and is no longer replaceable.
    set.record(Milestone::FirstImage, after(18));
    assert!(!set.is_derived(Milestone::FirstImage));
    assert!(!set.record_derived(Milestone::FirstImage, after(30)));
    assert_eq!(set.minutes_from_anchor(Milestone::FirstImage), Some(18));

    set.clear(Milestone::FirstImage);
    assert!(set.record_derived(Milestone::FirstImage, after(30)));
    set.clear_all();
    assert!(!set.is_derived(Milestone::FirstImage));
}

#[test]
fn imaging_badges_against_default_targets() {
    let targets = MilestoneTargets::default();
    let mut set = MilestoneSet::anchored_at(door());
    set.record(Milestone::ImagingOrdered, after(10));
    set.record(Milestone::FirstImage, after(22));
    set.record(Milestone::ImageInterpreted, after(50));

    let first = set.status(Milestone::FirstImage, &targets);
    assert_eq!(first.minutes_from_anchor, Some(22));
    assert_eq!(first.badge, TargetBadge::Met);

    let read = set.status(Milestone::ImageInterpreted, &targets);
    assert_eq!(read.minutes_from_anchor, Some(50));
    assert_eq!(read.badge, TargetBadge::Missed);

    assert_eq!(set.status(Milestone::ImagingOrdered, &targets).badge, TargetBadge::NoTarget);
    assert_eq!(set.status(Milestone::DrugAdministered, &targets).badge, TargetBadge::Pending);
}

#[test]
fn target_boundary_is_a_pass() {
    let targets = MilestoneTargets::default();
    let mut set = MilestoneSet::anchored_at(door());
    set.record(Milestone::FirstImage, after(25));
    assert_eq!(set.status(Milestone::FirstImage, &targets).badge, TargetBadge::Met);
}

#[test]
fn out_of_order_values_are_kept_and_flagged() {
    let targets = MilestoneTargets::default();
    let mut set = MilestoneSet::anchored_at(door());
    set.record(Milestone::EvaluatorAtBedside, after(-12));

    let status = set.status(Milestone::EvaluatorAtBedside, &targets);
    assert_eq!(status.minutes_from_anchor, Some(-12));
    assert!(status.out_of_order);
    assert_eq!(set.out_of_order(), vec![Milestone::EvaluatorAtBedside]);
}

#[test]
fn clear_all_keeps_the_anchor() {
    let mut set = MilestoneSet::anchored_at(door());
    set.record(Milestone::FirstImage, after(20));
    set.record(Milestone::Reperfusion, after(110));
    set.clear_all();
    assert!(set.recorded.is_empty());
    assert_eq!(set.anchor, Some(door()));
}

#[test]
fn back_computed_timestamps_land_on_the_minute() {
    let set = MilestoneSet::anchored_at(door());
    assert_eq!(set.at_minutes_from_anchor(42), Some(after(42)));
    assert_eq!(MilestoneSet::default().at_minutes_from_anchor(42), None);
}

#[test]
fn ids_parse_back() {
    for milestone in Milestone::ALL {
        assert_eq!(milestone.id().parse::<Milestone>().unwrap(), milestone);
    }
    assert!("door_to_lunch".parse::<Milestone>().is_err());
}

#[test]
fn set_serializes_with_string_keys() {
    let mut set = MilestoneSet::anchored_at(door());
    set.record(Milestone::FirstImage, after(22));
    let json = serde_json::to_string(&set).unwrap();
    assert!(json.contains("\"first_image\""));
    let back: MilestoneSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
}
