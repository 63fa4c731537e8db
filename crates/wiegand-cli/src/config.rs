//! Configuration file loading and command-line overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wiegand_core::constants::DEFAULT_CONFIG_PATH;
use wiegand_core::{CaptureConfig, DecoderConfig, DeviceId};

/// Application configuration (loaded from TOML).
///
/// Every key is optional:
///
/// ```toml
/// device_id = "gate"
/// skip_meta = false
///
/// [capture]
/// min_pulse_interval_us = 400
/// frame_timeout_ms = 50
/// swap_lines = false
///
/// [decoder]
/// invert_bits = false
/// salvage = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub device_id: DeviceId,
    pub skip_meta: bool,
    pub capture: CaptureConfig,
    pub decoder: DecoderConfig,
}

impl AppConfig {
    /// Check settings that serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.capture
            .validate()
            .context("Invalid [capture] settings")?;
        Ok(())
    }
}

/// Flags that take precedence over the config file.
///
/// Boolean flags can only switch a setting on.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub device: Option<String>,
    pub skip_meta: bool,
    pub swap_lines: bool,
    pub invert_bits: bool,
    pub reverse_bits: bool,
}

impl Overrides {
    pub fn apply(self, config: &mut AppConfig) -> Result<()> {
        if let Some(device) = self.device {
            config.device_id =
                DeviceId::new(device).context("Invalid --device")?;
        }
        config.skip_meta |= self.skip_meta;
        config.capture.swap_lines |= self.swap_lines;
        config.decoder.invert_bits |= self.invert_bits;
        config.decoder.reverse_bits |= self.reverse_bits;
        Ok(())
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// The explicit file if given, else the system file if it exists, else
/// defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let system = Path::new(DEFAULT_CONFIG_PATH);
            if system.is_file() {
                tracing::debug!(path = %system.display(), "Using system config");
                load_config(system)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}
