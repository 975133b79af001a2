//! Core data types for the Foco timers.
//!
//! This module defines:
//! - Phase identifiers for the Pomodoro and breathing timers
//! - Timer configuration with validation
//! - The render snapshot published after every state change

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;

pub use config::{BreathingPattern, PomodoroConfig};
pub use error::ConfigError;

// ============================================================================
// PomodoroPhase
// ============================================================================

/// Phases of the Pomodoro timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    /// Focused work
    #[default]
    Work,
    /// Short break between work phases
    ShortBreak,
    /// Long break after every N work phases
    LongBreak,
}

impl PomodoroPhase {
    /// All phases, in plan order.
    pub const ALL: [PomodoroPhase; 3] = [Self::Work, Self::ShortBreak, Self::LongBreak];

    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "work",
            PomodoroPhase::ShortBreak => "short_break",
            PomodoroPhase::LongBreak => "long_break",
        }
    }

    /// Returns the heading shown while the phase is active.
    pub fn label(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Tempo de Foco",
            PomodoroPhase::ShortBreak => "Pausa Curta",
            PomodoroPhase::LongBreak => "Pausa Longa",
        }
    }

    /// Returns true for either break phase.
    pub fn is_break(&self) -> bool {
        matches!(self, PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak)
    }
}

// ============================================================================
// BreathingPhase
// ============================================================================

/// Phases of one breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreathingPhase {
    /// Breathe in
    #[default]
    Inhale,
    /// Hold the breath
    Hold,
    /// Breathe out
    Exhale,
}

impl BreathingPhase {
    /// All phases, in plan order.
    pub const ALL: [BreathingPhase; 3] = [Self::Inhale, Self::Hold, Self::Exhale];

    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreathingPhase::Inhale => "inhale",
            BreathingPhase::Hold => "hold",
            BreathingPhase::Exhale => "exhale",
        }
    }

    /// Returns the prompt shown while the phase is active.
    pub fn label(&self) -> &'static str {
        match self {
            BreathingPhase::Inhale => "Inspire...",
            BreathingPhase::Hold => "Segure...",
            BreathingPhase::Exhale => "Expire...",
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// A read-only view of a timer, published after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Machine-readable phase identifier
    pub phase: String,
    /// Heading or prompt for the phase
    pub label: String,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Whether the countdown is active
    pub running: bool,
    /// Completed cycles so far
    pub completed_cycles: u32,
    /// Cycles that end the session, when the mode has a fixed count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cycles: Option<u32>,
    /// Pauses during the current work phase (Pomodoro only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interruption_count: Option<u32>,
    /// Seconds spent running in the work phase (Pomodoro only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_seconds: Option<u32>,
}

// ============================================================================
// Tests
// ============================================================================
