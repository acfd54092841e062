//! TOML-based application configuration.
//!
//! Stores the tunable constants of the session engine:
//! - Notification cadence and log capacity
//! - Capture dwell times
//! - Chime frequency band and envelope timing
//! - Clock refresh cadence
//!
//! Configuration is stored at `~/.config/phonelock/config.toml`. Every
//! value has a default, so a missing file yields a working configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Notification scheduling and log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Lower bound of the inter-notification delay (milliseconds).
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    /// Upper bound of the inter-notification delay (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Maximum number of notifications kept on the lock screen.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Probability of picking a group conversation over a direct contact.
    #[serde(default = "default_group_probability")]
    pub group_probability: f64,
}

/// Capture gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Dwell before unlock when a camera stream was obtained (milliseconds).
    #[serde(default = "default_dwell_camera_ms")]
    pub dwell_camera_ms: u64,
    /// Dwell before unlock without a camera (milliseconds).
    #[serde(default = "default_dwell_no_camera_ms")]
    pub dwell_no_camera_ms: u64,
    /// Offset of the cosmetic face-detected marker into the dwell
    /// (milliseconds). Never fires when it is not strictly before the dwell.
    #[serde(default = "default_detect_ms")]
    pub detect_ms: u64,
}

/// Chime synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChimeConfig {
    #[serde(default = "default_min_freq_hz")]
    pub min_freq_hz: f32,
    #[serde(default = "default_max_freq_hz")]
    pub max_freq_hz: f32,
    /// Exponential attack duration (milliseconds).
    #[serde(default = "default_attack_ms")]
    pub attack_ms: u64,
    /// Exponential decay duration after the attack (milliseconds).
    #[serde(default = "default_decay_ms")]
    pub decay_ms: u64,
    /// Total rendered length including the silent tail (milliseconds).
    #[serde(default = "default_total_ms")]
    pub total_ms: u64,
    /// Peak envelope gain.
    #[serde(default = "default_peak_gain")]
    pub peak_gain: f32,
}

/// Lock-screen clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Re-render cadence of the time/date text (seconds).
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub chime: ChimeConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

fn default_min_delay_ms() -> u64 {
    2400
}
fn default_max_delay_ms() -> u64 {
    7600
}
fn default_capacity() -> usize {
    6
}
fn default_group_probability() -> f64 {
    0.2
}
fn default_dwell_camera_ms() -> u64 {
    1500
}
fn default_dwell_no_camera_ms() -> u64 {
    900
}
fn default_detect_ms() -> u64 {
    900
}
fn default_min_freq_hz() -> f32 {
    440.0
}
fn default_max_freq_hz() -> f32 {
    880.0
}
fn default_attack_ms() -> u64 {
    20
}
fn default_decay_ms() -> u64 {
    200
}
fn default_total_ms() -> u64 {
    250
}
fn default_peak_gain() -> f32 {
    0.18
}
fn default_refresh_secs() -> u64 {
    30
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            capacity: default_capacity(),
            group_probability: default_group_probability(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            dwell_camera_ms: default_dwell_camera_ms(),
            dwell_no_camera_ms: default_dwell_no_camera_ms(),
            detect_ms: default_detect_ms(),
        }
    }
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            min_freq_hz: default_min_freq_hz(),
            max_freq_hz: default_max_freq_hz(),
            attack_ms: default_attack_ms(),
            decay_ms: default_decay_ms(),
            total_ms: default_total_ms(),
            peak_gain: default_peak_gain(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl Config {
    /// Directory holding the configuration file, created on demand.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("phonelock");
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        Ok(dir)
    }

    /// Path of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if it
    /// parses to an invalid configuration.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Check value-level consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notifications.min_delay_ms > self.notifications.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                key: "notifications.min_delay_ms".into(),
                message: "must not exceed notifications.max_delay_ms".into(),
            });
        }
        if self.notifications.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.capacity".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.notifications.group_probability) {
            return Err(ConfigError::InvalidValue {
                key: "notifications.group_probability".into(),
                message: "must be within [0, 1]".into(),
            });
        }
        if self.chime.min_freq_hz <= 0.0 || self.chime.min_freq_hz > self.chime.max_freq_hz {
            return Err(ConfigError::InvalidValue {
                key: "chime.min_freq_hz".into(),
                message: "must be positive and not exceed chime.max_freq_hz".into(),
            });
        }
        if self.chime.attack_ms + self.chime.decay_ms > self.chime.total_ms {
            return Err(ConfigError::InvalidValue {
                key: "chime.total_ms".into(),
                message: "must cover attack_ms + decay_ms".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.notifications.capacity, 6);
        assert_eq!(parsed.capture.dwell_camera_ms, 1500);
        assert_eq!(parsed.clock.refresh_secs, 30);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.notifications.min_delay_ms, 2400);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.notifications.capacity = 12;
        cfg.chime.max_freq_hz = 660.0;
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.notifications.capacity, 12);
        assert_eq!(loaded.chime.max_freq_hz, 660.0);
    }

    #[test]
    fn validate_rejects_inverted_interval() {
        let mut cfg = Config::default();
        cfg.notifications.min_delay_ms = 5000;
        cfg.notifications.max_delay_ms = 1000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let mut cfg = Config::default();
        cfg.notifications.capacity = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_freq_band() {
        let mut cfg = Config::default();
        cfg.chime.min_freq_hz = 900.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[notifications]\nmin_delay_ms = 100\n").unwrap();
        assert_eq!(cfg.notifications.min_delay_ms, 100);
        assert_eq!(cfg.notifications.max_delay_ms, 7600);
        assert_eq!(cfg.capture.dwell_no_camera_ms, 900);
    }
}
