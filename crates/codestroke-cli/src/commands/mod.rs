use std::path::{Path, PathBuf};
use std::sync::Arc;

use codestroke_core::clock::Clock;
use codestroke_storage::kv::FileStore;
use codestroke_workflow::config::EngineConfig;
use codestroke_workflow::event::WorkflowEvent;
use codestroke_workflow::service::WorkflowService;

pub mod dose;
pub mod live;
pub mod note;
pub mod replay;
pub mod reset;
pub mod window;

pub fn default_session_dir() -> eyre::Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| eyre::eyre!("no cache directory found"))?;
    Ok(base.join("codestroke").join("session"))
}

/// Open the service over the on-disk session and echo notices to stderr.
pub fn open_service(
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    session_dir: &Path,
) -> eyre::Result<WorkflowService> {
    let store = FileStore::new(session_dir);
    let mut service = WorkflowService::open(config, clock, Box::new(store))?;
    service.subscribe(print_notices);
    Ok(service)
}

pub fn print_notices(event: &WorkflowEvent) {
    if let WorkflowEvent::Notice { message } = event {
        eprintln!("notice: {message}");
    }
}
