//! User settings.
//!
//! Settings live in a JSON file at `$FOCO_CONFIG`, or
//! `<config_dir>/foco/settings.json` when unset. A missing file means
//! defaults; every field is optional. Persistent data (sessions, points,
//! notifications) goes to `$FOCO_DATA_DIR`, the `dataDir` setting, or
//! `<data_dir>/foco`, in that order.

mod error;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::error::SettingsError;
use crate::sound::SoundSource;
use crate::stats::WeeklyGoals;
use crate::types::{BreathingPattern, ConfigError, PomodoroConfig};

/// Environment variable overriding the settings file path.
pub const CONFIG_ENV: &str = "FOCO_CONFIG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FOCO_DATA_DIR";

/// Directory name under the platform config and data directories.
pub const APP_DIR: &str = "foco";

/// File name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// File name of the persisted notification list.
pub const NOTIFICATIONS_FILE_NAME: &str = "notifications.json";

/// Completion sound settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSettings {
    pub enabled: bool,
    /// Audio file to play instead of the built-in chime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl SoundSettings {
    /// Source to play on completion.
    pub fn source(&self) -> SoundSource {
        SoundSource::from_setting(self.path.as_deref())
    }
}

/// Everything read from the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub pomodoro: PomodoroConfig,
    /// Id of the breathing pattern used when none is given
    pub breathing_pattern: String,
    pub sound: SoundSettings,
    pub goals: WeeklyGoals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro: PomodoroConfig::default(),
            breathing_pattern: BreathingPattern::default().id,
            sound: SoundSettings::default(),
            goals: WeeklyGoals::default(),
            data_dir: None,
        }
    }
}

impl Settings {
    /// Loads settings from the default location.
    ///
    /// # Errors
    ///
    /// See [`Settings::load_from`].
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads settings from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds out-of-range values.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Path of the settings file: `$FOCO_CONFIG` or the platform default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoConfigDir`] if neither is available.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        if let Some(path) = non_empty(std::env::var_os(CONFIG_ENV)) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE_NAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Checks every value.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pomodoro.validate()?;
        self.default_breathing_pattern()?;
        Ok(())
    }

    /// The configured default breathing pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPattern`] for an unknown id.
    pub fn default_breathing_pattern(&self) -> Result<BreathingPattern, ConfigError> {
        BreathingPattern::find(&self.breathing_pattern)
    }

    /// Directory for persistent data, honoring `$FOCO_DATA_DIR`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoDataDir`] if no directory can be determined.
    pub fn data_dir(&self) -> Result<PathBuf, SettingsError> {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV))
    }

    fn resolve_data_dir(&self, env: Option<OsString>) -> Result<PathBuf, SettingsError> {
        if let Some(dir) = non_empty(env) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(SettingsError::NoDataDir)
    }
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pomodoro, PomodoroConfig::default());
        assert_eq!(settings.breathing_pattern, "4-7-8");
        assert!(settings.sound.enabled);
        assert_eq!(settings.sound.source(), SoundSource::Chime);
        assert_eq!(settings.goals, WeeklyGoals::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(
            &path,
            r#"{
                "pomodoro": { "workDuration": 50, "autoCycle": true },
                "breathingPattern": "quadrada",
                "sound": { "enabled": false },
                "goals": { "focusMinutes": 300 }
            }"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.pomodoro.work_minutes, 50);
        assert_eq!(settings.pomodoro.short_break_minutes, 5);
        assert!(settings.pomodoro.auto_cycle);
        assert_eq!(settings.default_breathing_pattern().unwrap().id, "quadrada");
        assert!(!settings.sound.enabled);
        assert_eq!(settings.goals.focus_minutes, 300);
        assert_eq!(settings.goals.breathing_sessions, 5);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{ "pomodoro": { "workDuration": 0 } }"#).unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_pattern_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{ "breathingPattern": "zen" }"#).unwrap();

        assert!(matches!(
            Settings::load_from(&path).unwrap_err(),
            SettingsError::Invalid(ConfigError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_data_dir_precedence() {
        let mut settings = Settings::default();
        settings.data_dir = Some(PathBuf::from("/srv/foco"));

        let from_env = settings
            .resolve_data_dir(Some(OsString::from("/tmp/foco-data")))
            .unwrap();
        assert_eq!(from_env, PathBuf::from("/tmp/foco-data"));

        let from_setting = settings.resolve_data_dir(None).unwrap();
        assert_eq!(from_setting, PathBuf::from("/srv/foco"));

        let empty_env = settings.resolve_data_dir(Some(OsString::new())).unwrap();
        assert_eq!(empty_env, PathBuf::from("/srv/foco"));
    }

    #[test]
    fn test_sound_path_setting() {
        let sound = SoundSettings {
            enabled: true,
            path: Some(PathBuf::from("/tmp/bell.wav")),
        };
        assert_eq!(sound.source(), SoundSource::file("/tmp/bell.wav"));
    }
}
