//! Foco Mágico Library
//!
//! Phase timers for focus and wellness. It includes:
//! - Pomodoro and breathing timers driven by a one-second tick engine
//! - Session recording, magic points and breathing logs in a local JSON store
//! - A notification center with optional file persistence
//! - Daily and weekly statistics
//! - Completion sound playback
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod notification;
pub mod sound;
pub mod stats;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    BreathingPattern, BreathingPhase, ConfigError, PomodoroConfig, PomodoroPhase, TimerSnapshot,
};

pub use config::{Settings, SettingsError};

pub use notification::{
    MockNotifier, Notice, Notification, NotificationCenter, NotificationError, NotificationKind,
    Notifier,
};

pub use store::{
    level_for_points, JsonStore, MockProgressLedger, MockSessionStore, ProgressLedger,
    SessionStore, StoreError, Task, TaskId,
};

pub use stats::{DailyStats, WeeklyGoals, WeeklySummary};

pub use timer::{
    BreathingTimer, Effect, EffectExecutor, PhaseTimer, PomodoroTimer, SessionRecorder, TaskRef,
    TimerCommand, TimerEngine, TimerEvent,
};

// Re-export sound types
pub use sound::{
    try_create_player, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource,
};
