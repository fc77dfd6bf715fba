use std::path::{Path, PathBuf};
use std::time::Duration;

use jiff::SignedDuration;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use codestroke_core::milestones::MilestoneTargets;
use codestroke_core::models::onset::PressureLimit;
use codestroke_core::session_keys;

use crate::error::WorkflowError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_ttl_minutes")]
    pub session_ttl_minutes: i64,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
    #[serde(default = "default_session_key")]
    pub session_key: String,
    /// IANA zone name for wall-clock entry and note output. Empty means
    /// the system zone.
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub targets: MilestoneTargets,
    #[serde(default)]
    pub pressure: PressureLimits,
    #[serde(default)]
    pub gates: GateConfig,
}

/// Blood-pressure ceilings, by treatment window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureLimits {
    /// Applies while any reperfusion therapy is still on the table, and
    /// whenever onset is unknown.
    pub reperfusion: PressureLimit,
    /// Applies once onset is beyond every treatment window.
    pub permissive: PressureLimit,
}

impl Default for PressureLimits {
    fn default() -> Self {
        Self {
            reperfusion: PressureLimit::default(),
            permissive: PressureLimit {
                systolic: 220,
                diastolic: 120,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// When set, an elevated pressure blocks stage 1 even with unknown
    /// onset until the treating flag is on.
    #[serde(default = "default_true")]
    pub require_pressure_ack_when_onset_unknown: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            require_pressure_ack_when_onset_unknown: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_minutes() -> i64 {
    120
}

fn default_tick_seconds() -> u64 {
    30
}

fn default_session_key() -> String {
    session_keys::ACTIVE_ENCOUNTER.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            session_ttl_minutes: default_ttl_minutes(),
            tick_seconds: default_tick_seconds(),
            session_key: default_session_key(),
            time_zone: String::new(),
            targets: MilestoneTargets::default(),
            pressure: PressureLimits::default(),
            gates: GateConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn session_ttl(&self) -> SignedDuration {
        SignedDuration::from_mins(self.session_ttl_minutes.max(0))
    }

    /// Tick period. Never zero.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_seconds.max(1))
    }

    pub fn zone(&self) -> Result<TimeZone, WorkflowError> {
        match self.time_zone.as_str() {
            "" => return Ok(TimeZone::system()),
            "UTC" => return Ok(TimeZone::UTC),
            _ => {}
        }
        TimeZone::get(&self.time_zone).map_err(|e| {
            WorkflowError::Config(format!("unknown time zone {:?}: {e}", self.time_zone))
        })
    }
}

pub fn config_dir() -> Result<PathBuf, WorkflowError> {
    let base = dirs::config_dir()
        .ok_or_else(|| WorkflowError::Config("no config directory found".to_string()))?;
    Ok(base.join("codestroke"))
}

pub fn config_path() -> Result<PathBuf, WorkflowError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Load from the default location. A missing file yields defaults.
pub fn load_config() -> Result<EngineConfig, WorkflowError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<EngineConfig, WorkflowError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(EngineConfig::default());
        }
        Err(e) => {
            return Err(WorkflowError::Config(format!(
                "failed to read config at {}: {e}",
                path.display()
            )));
        }
    };

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: EngineConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(
    mut json: serde_json::Value,
    from_version: u32,
) -> Result<serde_json::Value, WorkflowError> {
    if from_version > CURRENT_VERSION {
        return Err(WorkflowError::Config(format!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // v0 -> v1: files written before the version field share the v1 shape
    // and only need stamping.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| WorkflowError::Config("config is not a JSON object".to_string()))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("stamped unversioned config as v1");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}

pub fn save_config_to(path: &Path, config: &EngineConfig) -> Result<(), WorkflowError> {
    let dir = path
        .parent()
        .ok_or_else(|| WorkflowError::Config(format!("no parent for {}", path.display())))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
