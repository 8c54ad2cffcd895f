//! Scope configuration — loads optional ~/.sigscope/config.yaml.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for the poller and its transport. Every field has a working
/// default, so the file may set only what it cares about — or not exist.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScopeConfig {
    /// Signal service endpoint the poller posts to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Milliseconds between ticks while running.
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
    /// Window width in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: f64,
    /// Seconds the window slides per successful sweep.
    #[serde(default = "default_step_secs")]
    pub step_secs: f64,
    /// Hard per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8080/generate".into()
}

fn default_cadence_ms() -> u64 {
    100
}

fn default_window_secs() -> f64 {
    2.0
}

fn default_step_secs() -> f64 {
    0.01
}

fn default_request_timeout_ms() -> u64 {
    1000
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            cadence_ms: default_cadence_ms(),
            window_secs: default_window_secs(),
            step_secs: default_step_secs(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ScopeConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Get the config file path.
fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sigscope").join("config.yaml"))
}

/// Load configuration from ~/.sigscope/config.yaml.
/// Returns None if the file doesn't exist or doesn't parse.
pub fn load_config() -> Option<ScopeConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    serde_yaml::from_str(&content).ok()
}

/// The file's settings when present, the defaults otherwise.
pub fn load_or_default() -> ScopeConfig {
    load_config().unwrap_or_default()
}
