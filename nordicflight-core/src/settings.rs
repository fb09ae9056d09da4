use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::units::UnitSystem;

pub const SETTINGS_FILE: &str = "nordicflight.toml";
pub const UNITS_ENV_VAR: &str = "NORDICFLIGHT_UNITS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub dark_mode: bool,
    pub units: UnitSystem,
    pub sound: bool, // audible critical alert, off unless enabled
}

impl DisplaySettings {
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads `path` if it exists; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_units_override(std::env::var(UNITS_ENV_VAR).ok().as_deref())
    }

    fn with_units_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.parse() {
                Ok(units) => self.units = units,
                Err(err) => warn!(%err, var = UNITS_ENV_VAR, "ignoring unit override"),
            }
        }
        self
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn toggle_units(&mut self) {
        self.units = self.units.toggled();
    }

    pub fn toggle_sound(&mut self) {
        self.sound = !self.sound;
    }
}
