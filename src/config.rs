//! User settings persisted as JSON.
//!
//! The file lives in the user's config directory:
//! - Linux: ~/.config/pixelforge/settings.json
//! - macOS: ~/Library/Application Support/pixelforge/settings.json
//! - Windows: %APPDATA%\pixelforge\settings.json
//!
//! `PIXELFORGE_CONFIG` overrides the location.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::processing::codec::OutputFormat;

/// Environment variable that overrides the settings file location
pub const CONFIG_ENV: &str = "PIXELFORGE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Light,
    Dark,
}

/// Preferences that survive restarts
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Starting quality for lossy encoders (1-100)
    pub default_quality: u8,
    /// Starting target of the converter
    pub default_format: OutputFormat,
    /// Folder the file dialogs open in
    pub last_directory: Option<PathBuf>,
    pub theme: ThemeChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_quality: 80,
            default_format: OutputFormat::Jpeg,
            last_directory: None,
            theme: ThemeChoice::Light,
        }
    }
}

impl Settings {
    /// Location of the settings file
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Some(custom) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(custom));
        }

        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push("pixelforge");
        path.push("settings.json");
        Ok(path)
    }

    /// Load from the default location, falling back to defaults on any problem
    pub fn load() -> Self {
        match Self::path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("⚠️  Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.default_quality = settings.default_quality.clamp(1, 100);
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Remember the folder of a picked or saved file.
    ///
    /// Returns true when the stored folder changed.
    pub fn remember_directory(&mut self, file: &Path) -> bool {
        let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return false;
        };

        if self.last_directory.as_deref() == Some(parent) {
            return false;
        }
        self.last_directory = Some(parent.to_path_buf());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("pixelforge-test-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(&temp_settings_path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_settings_path();
        let settings = Settings {
            default_quality: 65,
            default_format: OutputFormat::Webp,
            last_directory: Some(PathBuf::from("/tmp/photos")),
            theme: ThemeChoice::Dark,
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_settings_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "theme": "dark", "unknown": 1, "default_quality": 250 }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.theme, ThemeChoice::Dark);
        assert_eq!(settings.default_format, OutputFormat::Jpeg);
        assert_eq!(settings.default_quality, 100);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_settings_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_remember_directory() {
        let mut settings = Settings::default();
        assert!(settings.remember_directory(Path::new("/home/me/pics/a.png")));
        assert!(!settings.remember_directory(Path::new("/home/me/pics/b.png")));
        assert_eq!(settings.last_directory, Some(PathBuf::from("/home/me/pics")));
        assert!(!settings.remember_directory(Path::new("bare.png")));
    }
}
