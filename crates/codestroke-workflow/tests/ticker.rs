use std::sync::Arc;
use std::time::Duration;

use codestroke_core::clock::{Clock, ManualClock};
use codestroke_workflow::ticker::Ticker;
use jiff::{SignedDuration, Timestamp};

fn start() -> Timestamp {
    "2026-03-01T10:00:00Z".parse().unwrap()
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period_with_clock_time() {
    let clock = Arc::new(ManualClock::new(start()));
    let ticker = Ticker::spawn(clock.clone(), Duration::from_secs(30));
    let mut rx = ticker.subscribe();
    assert_eq!(*rx.borrow_and_update(), start());

    let began = tokio::time::Instant::now();
    clock.advance(SignedDuration::from_secs(30));
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), clock.now());
    assert!(began.elapsed() >= Duration::from_secs(30));

    clock.advance(SignedDuration::from_secs(30));
    rx.changed().await.unwrap();
    assert!(began.elapsed() >= Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_ticker_stops_it() {
    let clock = Arc::new(ManualClock::new(start()));
    let ticker = Ticker::spawn(clock, Duration::from_secs(30));
    let mut rx = ticker.subscribe();

    drop(ticker);
    assert!(rx.changed().await.is_err());
}
