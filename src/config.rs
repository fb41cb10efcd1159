use crate::theme::{ThemeMode, ThemeStore};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETTINGS_ENV: &str = "PULSE_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "pulse_settings.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// User settings, stored as YAML.
///
/// Example:
///
/// theme_mode: Dark
/// command_port: 7878
/// step_goal: 10000
///
/// Missing fields take their default, unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme_mode: ThemeMode,
    pub command_port: u16,
    pub step_goal: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Light,
            command_port: 7878,
            step_goal: 10_000,
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = match fs::read_to_string(path) {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let shown = path.display();
                crate::config_log!(log::Level::Info, "No settings at {}, using defaults", shown);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io { path: path.to_path_buf(), source });
            }
        };
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&yaml)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        crate::config_log!(log::Level::Debug, "Saved settings to {}", path.display());
        Ok(())
    }
}

/// Settings location: `$PULSE_SETTINGS` or `pulse_settings.yml` in the working directory.
pub fn settings_path() -> PathBuf {
    env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

/// Keeps the theme mode in the settings file, leaving the other fields untouched.
#[derive(Debug, Clone)]
pub struct YamlThemeStore {
    path: PathBuf,
}

impl YamlThemeStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ThemeStore for YamlThemeStore {
    fn load(&self) -> Result<ThemeMode, ConfigError> {
        Settings::load(&self.path).map(|settings| settings.theme_mode)
    }

    fn save(&mut self, mode: ThemeMode) -> Result<(), ConfigError> {
        let mut settings = Settings::load(&self.path)?;
        settings.theme_mode = mode;
        settings.save(&self.path)
    }
}
