use std::path::Path;
use std::sync::Arc;

use codestroke_core::clock::SystemClock;
use codestroke_workflow::config::EngineConfig;

pub fn run(config: EngineConfig, session_dir: &Path) -> eyre::Result<()> {
    let mut service = super::open_service(config, Arc::new(SystemClock), session_dir)?;
    service.reset();
    println!("encounter reset");
    Ok(())
}
