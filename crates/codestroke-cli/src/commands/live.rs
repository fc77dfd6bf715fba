use std::path::Path;
use std::sync::Arc;

use codestroke_core::clock::{Clock, SystemClock};
use codestroke_workflow::config::EngineConfig;
use codestroke_workflow::event::{LiveStatus, WorkflowEvent};
use codestroke_workflow::ticker::Ticker;

pub async fn run(config: EngineConfig, session_dir: &Path) -> eyre::Result<()> {
    let period = config.tick_interval();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut service = super::open_service(config, clock.clone(), session_dir)?;
    service.subscribe(|event| {
        if let WorkflowEvent::Tick { status } = event {
            println!("{}", format_status(status));
        }
    });

    let ticker = Ticker::spawn(clock, period);
    let mut rx = ticker.subscribe();
    service.tick();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                service.tick();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn format_status(status: &LiveStatus) -> String {
    let elapsed = match status.elapsed_hours {
        Some(h) => format!("{h:.2} h since LKW"),
        None => "onset unknown".to_string(),
    };
    let window = status.window.map(|w| w.label()).unwrap_or("no window");
    let arrival = match status.minutes_since_arrival {
        Some(m) => format!("{m} min since arrival"),
        None => "no arrival time".to_string(),
    };
    format!(
        "[{}] {elapsed} | {window} | {arrival} | {}",
        status.now.strftime("%H:%M:%S"),
        status.stage.label()
    )
}
