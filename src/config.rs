//! Configuration file for the CLI
//!
//! Optional TOML file; every key has a default so a missing file or a
//! partial one both work. Command-line flags override file values.
//!
//! ```toml
//! [device]
//! vid = 0x04B3
//! pid = 0x301C
//!
//! [monitor]
//! interval_ms = 10
//! settle_ms = 500
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use blusb_keyboard::MonitorConfig;
use blusb_transport::{PRODUCT_ID, VENDOR_ID};
use serde::{Deserialize, Serialize};

/// USB identity of the controller to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub vid: u16,
    pub pid: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vid: VENDOR_ID,
            pid: PRODUCT_ID,
        }
    }
}

/// Matrix monitor timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Delay between matrix reads while idle
    pub interval_ms: u64,
    /// Pause before monitoring starts, so the Enter key that launched the
    /// command is released first
    pub settle_ms: u64,
    /// Upper bound on a monitoring session
    pub timeout_secs: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_ms: 10,
            settle_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl MonitorSettings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: Duration::from_millis(self.interval_ms),
            ..MonitorConfig::default()
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub monitor: MonitorSettings,
}

impl Config {
    /// Default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blusb")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }
}
