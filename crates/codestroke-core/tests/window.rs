use codestroke_core::window::{
    TreatmentWindow, classify_window, correct_future_onset, elapsed_hours, onset_elapsed_hours,
    resolve_wall_clock, window_findings_apply,
};
use jiff::{SignedDuration, Timestamp, civil, tz::TimeZone};

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

#[test]
fn missing_onset_is_zero_hours() {
    let now = ts("2026-03-01T12:00:00Z");
    assert_eq!(elapsed_hours(None, now), 0.0);
    assert_eq!(onset_elapsed_hours(None, now), None);
}

#[test]
fn elapsed_hours_is_fractional() {
    let now = ts("2026-03-01T12:00:00Z");
    let onset = ts("2026-03-01T09:30:00Z");
    assert_eq!(elapsed_hours(Some(onset), now), 2.5);
}

#[test]
fn future_onset_floors_at_zero() {
    let now = ts("2026-03-01T12:00:00Z");
    let onset = ts("2026-03-01T12:45:00Z");
    assert_eq!(elapsed_hours(Some(onset), now), 0.0);
}

#[test]
fn elapsed_is_never_negative_for_past_onsets() {
    let now = ts("2026-03-01T12:00:00Z");
    for minutes in [0_i64, 1, 59, 270, 271, 540, 1440, 10_000] {
        let onset = now.checked_sub(SignedDuration::from_mins(minutes)).unwrap();
        assert!(elapsed_hours(Some(onset), now) >= 0.0);
    }
}

#[test]
fn boundaries_fall_into_lower_band() {
    assert_eq!(classify_window(0.0), TreatmentWindow::WithinStandard);
    assert_eq!(classify_window(4.5), TreatmentWindow::WithinStandard);
    assert_eq!(classify_window(4.500_001), TreatmentWindow::Extended);
    assert_eq!(classify_window(9.0), TreatmentWindow::Extended);
    assert_eq!(classify_window(9.01), TreatmentWindow::LateEvt);
    assert_eq!(classify_window(24.0), TreatmentWindow::LateEvt);
    assert_eq!(classify_window(24.01), TreatmentWindow::Outside);
    assert_eq!(classify_window(1000.0), TreatmentWindow::Outside);
}

#[test]
fn classification_is_monotonic_over_a_sweep() {
    let mut previous = TreatmentWindow::WithinStandard;
    let order = |w: TreatmentWindow| match w {
        TreatmentWindow::WithinStandard => 0,
        TreatmentWindow::Extended => 1,
        TreatmentWindow::LateEvt => 2,
        TreatmentWindow::Outside => 3,
    };
    for step in 0..=600 {
        let hours = f64::from(step) * 0.05;
        let window = classify_window(hours);
        assert!(order(window) >= order(previous), "band went backwards at {hours}");
        previous = window;
    }
    assert_eq!(previous, TreatmentWindow::Outside);
}

#[test]
fn window_findings_apply_only_between_three_and_four_and_a_half() {
    assert!(!window_findings_apply(None));
    assert!(!window_findings_apply(Some(2.0)));
    assert!(!window_findings_apply(Some(3.0)));
    assert!(window_findings_apply(Some(3.01)));
    assert!(window_findings_apply(Some(4.5)));
    assert!(!window_findings_apply(Some(4.51)));
}

#[test]
fn wall_clock_entry_in_the_future_means_yesterday() {
    let now = ts("2026-03-01T10:00:00Z").to_zoned(TimeZone::UTC);

    let earlier = resolve_wall_clock(civil::time(8, 15, 0, 0), &now).unwrap();
    assert_eq!(earlier, ts("2026-03-01T08:15:00Z"));

    let later = resolve_wall_clock(civil::time(14, 30, 0, 0), &now).unwrap();
    assert_eq!(later, ts("2026-02-28T14:30:00Z"));
}

#[test]
fn absolute_future_onset_is_rolled_back_one_day() {
    let now = ts("2026-03-01T10:00:00Z");
    assert_eq!(
        correct_future_onset(ts("2026-03-01T11:00:00Z"), now),
        ts("2026-02-28T11:00:00Z")
    );
    let past = ts("2026-03-01T09:00:00Z");
    assert_eq!(correct_future_onset(past, now), past);
}
