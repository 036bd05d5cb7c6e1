//! Control-core configuration
//!
//! Timing and sizing knobs for the controller manager. Loads from a YAML
//! file when one is present, otherwise falls back to defaults tuned for a
//! 1 kHz control loop.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config location relative to the process working directory.
const CONFIG_PATH: &str = ".tendon/control.yaml";

/// Configuration for the controller manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Milliseconds without an accepted tick before the session counts as
    /// stale and control reverts to the default policy
    pub staleness_threshold_ms: u64,

    /// Upper bound in milliseconds a lifecycle command will wait for the
    /// tick path to consume a requested transition
    pub handshake_timeout_ms: u64,

    /// Initial capacity of the state log, in entries
    pub state_log_capacity: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            // 100 ticks of headroom at 1 kHz
            staleness_threshold_ms: 100,
            handshake_timeout_ms: 5_000,
            state_log_capacity: 4_096,
        }
    }
}

impl ControlConfig {
    /// Load from the default location if present, defaults otherwise.
    pub fn init() -> Self {
        let path = PathBuf::from(CONFIG_PATH);
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Load from an explicit YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn staleness_threshold(&self) -> Duration {
        Duration::from_millis(self.staleness_threshold_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_suit_a_1khz_loop() {
        let config = ControlConfig::default();
        assert_eq!(config.staleness_threshold(), Duration::from_millis(100));
        assert!(config.handshake_timeout() > config.staleness_threshold());
        assert!(config.state_log_capacity > 0);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: ControlConfig = serde_yaml::from_str("staleness_threshold_ms: 50\n").unwrap();
        assert_eq!(config.staleness_threshold_ms, 50);
        assert_eq!(
            config.handshake_timeout_ms,
            ControlConfig::default().handshake_timeout_ms
        );
    }
}
