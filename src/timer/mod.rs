//! Phase timers.
//!
//! - [`plan`]: phase tables and the sequencer that walks them
//! - [`PomodoroTimer`] / [`BreathingTimer`]: pure state machines returning [`Effect`]s
//! - [`TickSource`]: single-flight one-second schedule
//! - [`EffectExecutor`]: hands effects to the notifier, recorder, ledger and sound player
//! - [`SessionRecorder`]: background task that persists work sessions
//! - [`TimerEngine`]: event loop tying the above together

mod breathing;
mod effect;
mod engine;
mod executor;
pub mod plan;
mod pomodoro;
mod recorder;
mod ticker;

pub use breathing::BreathingTimer;
pub use effect::{Effect, SessionHandle, TaskRef, BREATHING_POINTS};
pub use engine::{PhaseTimer, TimerCommand, TimerEngine, TimerEvent};
pub use executor::EffectExecutor;
pub use plan::{advance, BreathingPlan, PhasePlan, PomodoroPlan};
pub use pomodoro::PomodoroTimer;
pub use recorder::{RecorderHandle, RecorderMessage, SessionRecorder};
pub use ticker::{TickSource, TICK_PERIOD};
