//! Command definitions for the Foco CLI.
//!
//! Uses clap derive macro for argument parsing. Timer options are optional
//! so that values from the settings file apply when a flag is absent.

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::store::TaskId;
use crate::types::{BreathingPattern, ConfigError, PomodoroConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Foco Mágico - Pomodoro and breathing timers for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "foco",
    version,
    about = "Timer Pomodoro e exercícios de respiração no terminal",
    long_about = "Timer Pomodoro com pausas curtas e longas, exercícios de respiração guiada,\n\
                  estatísticas diárias e semanais e Pontos Mágicos.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive Pomodoro timer
    Pomodoro(PomodoroArgs),

    /// Run a guided breathing exercise
    Breathe(BreatheArgs),

    /// List the built-in breathing patterns
    Patterns,

    /// Show focus statistics
    Stats(StatsArgs),

    /// List or manage notifications
    Notifications(NotificationsArgs),

    /// List or manage the task list
    Tasks(TasksArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Pomodoro Arguments
// ============================================================================

/// Arguments for the pomodoro command
#[derive(Args, Debug, Clone, Default)]
pub struct PomodoroArgs {
    /// Work duration in minutes (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Short break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Work sessions before a long break (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub sessions: Option<u32>,

    /// Task for this session: an id from `foco tasks` or a free-text name
    #[arg(short, long, value_parser = validate_task_name)]
    pub task: Option<String>,

    /// Keep running into the next phase automatically
    #[arg(short, long)]
    pub auto_cycle: bool,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,
}

impl PomodoroArgs {
    /// The task list id given with `--task`, when the value is numeric.
    pub fn task_id(&self) -> Option<TaskId> {
        self.task.as_deref()?.parse().ok().map(TaskId)
    }

    /// Overlays the flags given on the command line onto `base`.
    pub fn apply_to(&self, base: PomodoroConfig) -> PomodoroConfig {
        PomodoroConfig {
            work_minutes: self.work.unwrap_or(base.work_minutes),
            short_break_minutes: self.short_break.unwrap_or(base.short_break_minutes),
            long_break_minutes: self.long_break.unwrap_or(base.long_break_minutes),
            sessions_until_long_break: self.sessions.unwrap_or(base.sessions_until_long_break),
            auto_cycle: self.auto_cycle || base.auto_cycle,
        }
    }
}

// ============================================================================
// Breathe Arguments
// ============================================================================

/// Arguments for the breathe command
#[derive(Args, Debug, Clone, Default)]
pub struct BreatheArgs {
    /// Built-in pattern (4-7-8, quadrada, energizante)
    #[arg(short, long, conflicts_with_all = ["inhale", "hold", "exhale"])]
    pub pattern: Option<String>,

    /// Inhale seconds (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub inhale: Option<u32>,

    /// Hold seconds (0-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=60))]
    pub hold: Option<u32>,

    /// Exhale seconds (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub exhale: Option<u32>,

    /// Number of cycles (1-50)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub cycles: Option<u32>,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,
}

impl BreatheArgs {
    /// Picks the pattern to run.
    ///
    /// A named pattern wins; otherwise any timing flag turns `default` into
    /// a custom pattern with those values replaced. `--cycles` applies to
    /// named patterns too.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown pattern name.
    pub fn resolve(&self, default: BreathingPattern) -> Result<BreathingPattern, ConfigError> {
        let mut pattern = match &self.pattern {
            Some(name) => BreathingPattern::find(name)?,
            None if self.has_custom_timing() => BreathingPattern::custom(
                self.inhale.unwrap_or(default.inhale),
                self.hold.unwrap_or(default.hold),
                self.exhale.unwrap_or(default.exhale),
                default.cycles,
            ),
            None => default,
        };
        if let Some(cycles) = self.cycles {
            pattern.cycles = cycles;
        }
        Ok(pattern)
    }

    fn has_custom_timing(&self) -> bool {
        self.inhale.is_some() || self.hold.is_some() || self.exhale.is_some()
    }
}

// ============================================================================
// Stats / Notifications Arguments
// ============================================================================

/// Arguments for the stats command
#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// Show the current week instead of today
    #[arg(short, long)]
    pub week: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the notifications command
#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("action").args(["read", "remove", "read_all", "clear"])))]
pub struct NotificationsArgs {
    /// Mark one notification as read
    #[arg(long, value_name = "ID")]
    pub read: Option<String>,

    /// Delete one notification
    #[arg(long, value_name = "ID")]
    pub remove: Option<String>,

    /// Mark every notification as read
    #[arg(long)]
    pub read_all: bool,

    /// Delete every notification
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the tasks command
#[derive(Args, Debug, Clone, Default)]
pub struct TasksArgs {
    /// Action to apply; lists the tasks when omitted
    #[command(subcommand)]
    pub action: Option<TaskAction>,
}

/// Task list actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        #[arg(value_parser = validate_task_name)]
        text: String,
    },

    /// Mark a task as done, or as pending again
    #[command(alias = "done")]
    Toggle {
        /// Task id
        id: u64,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Remove {
        /// Task id
        id: u64,
    },
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the task name.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_task_name(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("o nome da tarefa não pode ficar vazio".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("o nome da tarefa deve ter no máximo 100 caracteres".to_string());
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================
