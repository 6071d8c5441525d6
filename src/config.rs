use serde::Deserialize;
use std::fs;
use std::time::Duration;
use tracing::debug;

use crate::common::constants::{DEFAULT_LOOKUP_DELAY_MS, DEFAULT_LOOKUP_TIMEOUT_SECONDS};
use crate::common::error::{PipelineError, Result};

/// Optional process-level settings loaded from `config.toml`.
/// Every knob has a default, so a missing file is not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lookup: LookupSettings,
}

/// Pacing and timeout discipline for the external lookup strategies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Fixed delay between successive OEM lookups (politeness, not correctness).
    pub delay_ms: u64,
    /// Single bounded timeout per external call; no retries.
    pub timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookup: LookupSettings::default(),
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_LOOKUP_DELAY_MS,
            timeout_seconds: DEFAULT_LOOKUP_TIMEOUT_SECONDS,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        match fs::read_to_string(config_path) {
            Ok(content) => {
                let settings: Settings = toml::from_str(&content).map_err(|e| {
                    PipelineError::Config(format!(
                        "failed to parse config file '{}': {}",
                        config_path, e
                    ))
                })?;
                Ok(settings)
            }
            Err(_) => {
                debug!("no config.toml found, using default settings");
                Ok(Settings::default())
            }
        }
    }
}

impl LookupSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
