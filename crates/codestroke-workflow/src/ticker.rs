use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use codestroke_core::clock::Clock;

/// One shared periodic tick. Views subscribe to the watch channel
/// instead of running their own timers.
///
/// Missed ticks are skipped, so it never fires faster than `period`.
/// The task is aborted when the `Ticker` is dropped.
pub struct Ticker {
    rx: watch::Receiver<Timestamp>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Must be called from within a tokio runtime.
    pub fn spawn(clock: Arc<dyn Clock>, period: Duration) -> Self {
        let (tx, rx) = watch::channel(clock.now());
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(clock.now()).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "ticker started");
        Self { rx, handle }
    }

    pub fn subscribe(&self) -> watch::Receiver<Timestamp> {
        self.rx.clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
