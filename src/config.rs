//! # Settings Management
//!
//! This module handles loading and parsing the wearer's settings from the
//! watch-settings.toml file. It is the simulator-side stand-in for the
//! settings word a hardware build keeps in backup RAM: clock mode, time
//! zone and alert flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Wearer settings loaded from watch-settings.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Clock display configuration
    pub clock: ClockSettings,
    /// Alarm and chime configuration
    pub alerts: AlertSettings,
}

/// Clock display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClockSettings {
    /// Index into the time-zone offset table (0 = UTC)
    pub time_zone: u8,
    /// Whether to show 24-hour time (true) or 12-hour time with a PM
    /// indicator (false)
    pub mode_24h: bool,
    /// Whether 24-hour mode pads the hour to two digits ("09") or shows
    /// a bare single digit (" 9")
    pub leading_zero_24h: bool,
}

/// Alarm and hourly chime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertSettings {
    /// Whether the wake alarm is armed (drives the bell indicator)
    pub alarm_enabled: bool,
    /// Whether the hourly chime is enabled (drives the signal indicator)
    pub hourly_chime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            clock: ClockSettings {
                time_zone: 0, // UTC until the wearer picks a zone
                mode_24h: false,
                leading_zero_24h: false,
            },
            alerts: AlertSettings {
                alarm_enabled: false,
                hourly_chime: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from watch-settings.toml
    /// Falls back to default settings if the file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("watch-settings.toml")
    }

    /// Load settings from specified path
    /// Falls back to default settings if the file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Settings>(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Warning: Invalid settings file format: {}", e);
                    eprintln!("Using default settings (12-hour clock, UTC)");
                    Self::default()
                }
            },
            Err(_) => {
                eprintln!("Info: No settings file found, using default settings (12-hour clock, UTC)");
                Self::default()
            }
        }
    }

    /// Save current settings to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
