use jiff::{Timestamp, civil};

use codestroke_core::window;
use codestroke_workflow::config::EngineConfig;

pub fn run(config: &EngineConfig, lkw: &str, at: Option<&str>) -> eyre::Result<()> {
    let zone = config.zone()?;
    let now = match at {
        Some(s) => s.parse::<Timestamp>()?,
        None => Timestamp::now(),
    };

    let onset = match lkw.parse::<Timestamp>() {
        Ok(ts) => window::correct_future_onset(ts, now),
        Err(_) => {
            let time: civil::Time = lkw
                .parse()
                .map_err(|e| eyre::eyre!("--lkw must be RFC 3339 or HH:MM ({e})"))?;
            window::resolve_wall_clock(time, &now.to_zoned(zone.clone()))?
        }
    };

    let hours = window::elapsed_hours(Some(onset), now);
    let band = window::classify_window(hours);
    println!("Last known well: {}", onset.to_zoned(zone).strftime("%Y-%m-%d %H:%M %Z"));
    println!("Elapsed: {hours:.2} h");
    println!("Window: {}", band.label());
    println!(
        "IV thrombolysis considered: {}",
        if band.thrombolysis_considered() { "yes" } else { "no" }
    );
    println!(
        "3-4.5 h contraindications apply: {}",
        if window::window_findings_apply(Some(hours)) { "yes" } else { "no" }
    );
    Ok(())
}
