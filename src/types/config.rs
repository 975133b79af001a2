//! Timer configuration types with validation.
//!
//! `PomodoroConfig` is expressed in minutes and `BreathingPattern` in
//! seconds. Both are validated before they are turned into a phase plan.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Accepted range for the work phase, in minutes.
pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 120);
/// Accepted range for either break phase, in minutes.
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);
/// Accepted range for the number of work phases before a long break.
pub const SESSIONS_RANGE: (u32, u32) = (1, 12);
/// Accepted range for inhale and exhale, in seconds.
pub const BREATH_SECONDS_RANGE: (u32, u32) = (1, 60);
/// Accepted range for the hold phase, in seconds. Zero skips the phase.
pub const HOLD_SECONDS_RANGE: (u32, u32) = (0, 60);
/// Accepted range for breathing cycles per session.
pub const BREATH_CYCLES_RANGE: (u32, u32) = (1, 50);

fn check(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::out_of_range(field, value, min, max));
    }
    Ok(())
}

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Configuration for the Pomodoro timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroConfig {
    /// Work duration in minutes (1-120)
    #[serde(rename = "workDuration")]
    pub work_minutes: u32,
    /// Short break duration in minutes (1-60)
    #[serde(rename = "shortBreakDuration")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    #[serde(rename = "longBreakDuration")]
    pub long_break_minutes: u32,
    /// Completed work phases between long breaks (1-12)
    #[serde(rename = "sessionsUntilLongBreak")]
    pub sessions_until_long_break: u32,
    /// Keep running into the next phase instead of stopping at each boundary
    #[serde(rename = "autoCycle")]
    pub auto_cycle: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
            auto_cycle: false,
        }
    }
}

impl PomodoroConfig {
    /// Returns the configuration with the specified work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Returns the configuration with the specified short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Returns the configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Returns the configuration with the specified long break interval.
    pub fn with_sessions_until_long_break(mut self, sessions: u32) -> Self {
        self.sessions_until_long_break = sessions;
        self
    }

    /// Returns the configuration with auto-cycle toggled.
    pub fn with_auto_cycle(mut self, auto_cycle: bool) -> Self {
        self.auto_cycle = auto_cycle;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("workDuration", self.work_minutes, WORK_MINUTES_RANGE)?;
        check(
            "shortBreakDuration",
            self.short_break_minutes,
            BREAK_MINUTES_RANGE,
        )?;
        check(
            "longBreakDuration",
            self.long_break_minutes,
            BREAK_MINUTES_RANGE,
        )?;
        check(
            "sessionsUntilLongBreak",
            self.sessions_until_long_break,
            SESSIONS_RANGE,
        )?;
        Ok(())
    }
}

// ============================================================================
// BreathingPattern
// ============================================================================

/// A guided breathing pattern. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    /// Short identifier used on the command line
    pub id: String,
    /// Display name
    pub name: String,
    /// One-line description of the pattern's purpose
    #[serde(default)]
    pub description: String,
    /// Inhale duration (1-60)
    pub inhale: u32,
    /// Hold duration (0-60); zero skips the hold phase
    #[serde(default)]
    pub hold: u32,
    /// Exhale duration (1-60)
    pub exhale: u32,
    /// Number of inhale-hold-exhale cycles per session (1-50)
    pub cycles: u32,
}

impl BreathingPattern {
    /// Creates a custom pattern.
    pub fn custom(inhale: u32, hold: u32, exhale: u32, cycles: u32) -> Self {
        Self {
            id: "custom".to_string(),
            name: format!("Respiração {}-{}-{}", inhale, hold, exhale),
            description: "Padrão personalizado".to_string(),
            inhale,
            hold,
            exhale,
            cycles,
        }
    }

    /// The 4-7-8 pattern: calms the mind and reduces anxiety.
    pub fn four_seven_eight() -> Self {
        Self {
            id: "4-7-8".to_string(),
            name: "Respiração 4-7-8".to_string(),
            description: "Acalme a mente e reduza a ansiedade".to_string(),
            inhale: 4,
            hold: 7,
            exhale: 8,
            cycles: 4,
        }
    }

    /// Box breathing: improves focus and concentration.
    pub fn square() -> Self {
        Self {
            id: "quadrada".to_string(),
            name: "Respiração Quadrada".to_string(),
            description: "Aumente o foco e a concentração".to_string(),
            inhale: 4,
            hold: 4,
            exhale: 4,
            cycles: 4,
        }
    }

    /// Energizing breath: no hold, short exhale.
    pub fn energizing() -> Self {
        Self {
            id: "energizante".to_string(),
            name: "Respiração Energizante".to_string(),
            description: "Aumente sua energia e disposição".to_string(),
            inhale: 6,
            hold: 0,
            exhale: 2,
            cycles: 6,
        }
    }

    /// Returns all built-in patterns, the default one first.
    pub fn builtin() -> Vec<Self> {
        vec![Self::four_seven_eight(), Self::square(), Self::energizing()]
    }

    /// Looks up a built-in pattern by id (case-insensitive).
    pub fn find(id: &str) -> Result<Self, ConfigError> {
        let wanted = id.trim().to_lowercase();
        Self::builtin()
            .into_iter()
            .find(|p| p.id == wanted)
            .ok_or_else(|| ConfigError::UnknownPattern(id.to_string()))
    }

    /// Total length of one cycle in seconds.
    pub fn cycle_seconds(&self) -> u32 {
        self.inhale + self.hold + self.exhale
    }

    /// Validates the pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("inhale", self.inhale, BREATH_SECONDS_RANGE)?;
        check("hold", self.hold, HOLD_SECONDS_RANGE)?;
        check("exhale", self.exhale, BREATH_SECONDS_RANGE)?;
        check("cycles", self.cycles, BREATH_CYCLES_RANGE)?;
        Ok(())
    }
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self::four_seven_eight()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod pomodoro_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = PomodoroConfig::default();
            assert_eq!(config.work_minutes, 25);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_minutes, 15);
            assert_eq!(config.sessions_until_long_break, 4);
            assert!(!config.auto_cycle);
        }

        #[test]
        fn test_builder_pattern() {
            let config = PomodoroConfig::default()
                .with_work_minutes(50)
                .with_short_break_minutes(10)
                .with_long_break_minutes(30)
                .with_sessions_until_long_break(3)
                .with_auto_cycle(true);

            assert_eq!(config.work_minutes, 50);
            assert_eq!(config.short_break_minutes, 10);
            assert_eq!(config.long_break_minutes, 30);
            assert_eq!(config.sessions_until_long_break, 3);
            assert!(config.auto_cycle);
        }

        #[test]
        fn test_validate_boundary_values() {
            let config = PomodoroConfig::default()
                .with_work_minutes(1)
                .with_short_break_minutes(1)
                .with_long_break_minutes(1)
                .with_sessions_until_long_break(1);
            assert!(config.validate().is_ok());

            let config = PomodoroConfig::default()
                .with_work_minutes(120)
                .with_short_break_minutes(60)
                .with_long_break_minutes(60)
                .with_sessions_until_long_break(12);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_zero_durations() {
            for config in [
                PomodoroConfig::default().with_work_minutes(0),
                PomodoroConfig::default().with_short_break_minutes(0),
                PomodoroConfig::default().with_long_break_minutes(0),
                PomodoroConfig::default().with_sessions_until_long_break(0),
            ] {
                assert!(config.validate().is_err(), "{:?}", config);
            }
        }

        #[test]
        fn test_validate_rejects_too_long() {
            let err = PomodoroConfig::default()
                .with_work_minutes(121)
                .validate()
                .unwrap_err();
            assert_eq!(
                err,
                ConfigError::OutOfRange {
                    field: "workDuration",
                    value: 121,
                    min: 1,
                    max: 120
                }
            );
        }

        #[test]
        fn test_deserialize_settings_shape() {
            let json = r#"{"workDuration":50,"shortBreakDuration":10,"longBreakDuration":20,"sessionsUntilLongBreak":2}"#;
            let config: PomodoroConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.work_minutes, 50);
            assert_eq!(config.sessions_until_long_break, 2);
            assert!(!config.auto_cycle);
        }

        #[test]
        fn test_deserialize_missing_fields_uses_defaults() {
            let config: PomodoroConfig = serde_json::from_str(r#"{"workDuration":30}"#).unwrap();
            assert_eq!(config.work_minutes, 30);
            assert_eq!(config.short_break_minutes, 5);
            assert_eq!(config.long_break_minutes, 15);
        }
    }

    mod breathing_pattern_tests {
        use super::*;

        #[test]
        fn test_builtin_patterns_are_valid() {
            for pattern in BreathingPattern::builtin() {
                assert!(pattern.validate().is_ok(), "{}", pattern.id);
            }
        }

        #[test]
        fn test_default_is_four_seven_eight() {
            let pattern = BreathingPattern::default();
            assert_eq!(pattern.id, "4-7-8");
            assert_eq!(
                (pattern.inhale, pattern.hold, pattern.exhale, pattern.cycles),
                (4, 7, 8, 4)
            );
            assert_eq!(pattern.cycle_seconds(), 19);
        }

        #[test]
        fn test_find() {
            assert_eq!(BreathingPattern::find("quadrada").unwrap().hold, 4);
            assert_eq!(BreathingPattern::find(" Energizante ").unwrap().hold, 0);
            assert_eq!(
                BreathingPattern::find("zen").unwrap_err(),
                ConfigError::UnknownPattern("zen".to_string())
            );
        }

        #[test]
        fn test_custom_pattern() {
            let pattern = BreathingPattern::custom(5, 0, 5, 10);
            assert_eq!(pattern.id, "custom");
            assert_eq!(pattern.name, "Respiração 5-0-5");
            assert!(pattern.validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_zero_inhale_exhale_and_cycles() {
            assert!(BreathingPattern::custom(0, 4, 4, 4).validate().is_err());
            assert!(BreathingPattern::custom(4, 4, 0, 4).validate().is_err());
            assert!(BreathingPattern::custom(4, 4, 4, 0).validate().is_err());
        }

        #[test]
        fn test_validate_allows_zero_hold() {
            assert!(BreathingPattern::custom(4, 0, 4, 4).validate().is_ok());
        }
    }
}
