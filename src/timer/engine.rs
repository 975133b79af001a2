//! Timer engine: drives a timer from commands and ticks.
//!
//! The engine owns one timer, one [`TickSource`] and one [`EffectExecutor`].
//! Each loop iteration handles either a command or a tick, executes the
//! resulting effects, re-arms or disarms the tick source to match the
//! timer, and publishes a [`TimerEvent`].

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::breathing::BreathingTimer;
use super::effect::{Effect, TaskRef};
use super::executor::EffectExecutor;
use super::pomodoro::PomodoroTimer;
use super::ticker::TickSource;
use crate::notification::content;
use crate::types::{BreathingPattern, ConfigError, PomodoroConfig, TimerSnapshot};

// ============================================================================
// TimerCommand / TimerEvent
// ============================================================================

/// User actions sent to a running engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand<C> {
    /// Start or resume, optionally naming the task
    Start { task: Option<TaskRef> },
    /// Pause the countdown
    Pause,
    /// Stop and rewind
    Reset,
    /// Skip the current break
    Skip,
    /// Replace the configuration (only while stopped with no open session)
    Reconfigure(C),
    /// Close open sessions and stop the engine
    Shutdown,
}

/// Updates published by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed
    Tick(TimerSnapshot),
    /// A command changed (or was applied to) the timer
    Changed(TimerSnapshot),
    /// The session reached its end
    Completed(TimerSnapshot),
}

impl TimerEvent {
    /// Returns the snapshot carried by the event.
    pub fn snapshot(&self) -> &TimerSnapshot {
        match self {
            Self::Tick(s) | Self::Changed(s) | Self::Completed(s) => s,
        }
    }
}

// ============================================================================
// PhaseTimer
// ============================================================================

/// The operations the engine needs from a timer.
pub trait PhaseTimer {
    /// Configuration accepted by [`reconfigure`](Self::reconfigure).
    type Config;

    fn start(&mut self, task: Option<TaskRef>) -> Vec<Effect>;
    fn pause(&mut self) -> Vec<Effect>;
    fn reset(&mut self) -> Vec<Effect>;
    fn skip(&mut self) -> Vec<Effect>;
    fn reconfigure(&mut self, config: Self::Config) -> Result<(), ConfigError>;
    fn tick(&mut self) -> Vec<Effect>;
    fn shutdown(&mut self) -> Vec<Effect>;
    fn is_running(&self) -> bool;
    fn snapshot(&self) -> TimerSnapshot;
}

impl PhaseTimer for PomodoroTimer {
    type Config = PomodoroConfig;

    fn start(&mut self, task: Option<TaskRef>) -> Vec<Effect> {
        PomodoroTimer::start(self, task)
    }

    fn pause(&mut self) -> Vec<Effect> {
        PomodoroTimer::pause(self)
    }

    fn reset(&mut self) -> Vec<Effect> {
        PomodoroTimer::reset(self)
    }

    fn skip(&mut self) -> Vec<Effect> {
        PomodoroTimer::skip(self)
    }

    fn reconfigure(&mut self, config: PomodoroConfig) -> Result<(), ConfigError> {
        PomodoroTimer::reconfigure(self, config)
    }

    fn tick(&mut self) -> Vec<Effect> {
        PomodoroTimer::tick(self)
    }

    fn shutdown(&mut self) -> Vec<Effect> {
        PomodoroTimer::shutdown(self)
    }

    fn is_running(&self) -> bool {
        PomodoroTimer::is_running(self)
    }

    fn snapshot(&self) -> TimerSnapshot {
        PomodoroTimer::snapshot(self)
    }
}

impl PhaseTimer for BreathingTimer {
    type Config = BreathingPattern;

    fn start(&mut self, _task: Option<TaskRef>) -> Vec<Effect> {
        BreathingTimer::start(self)
    }

    fn pause(&mut self) -> Vec<Effect> {
        self.stop()
    }

    fn reset(&mut self) -> Vec<Effect> {
        self.stop()
    }

    fn skip(&mut self) -> Vec<Effect> {
        Vec::new()
    }

    fn reconfigure(&mut self, pattern: BreathingPattern) -> Result<(), ConfigError> {
        self.select_pattern(pattern)
    }

    fn tick(&mut self) -> Vec<Effect> {
        BreathingTimer::tick(self)
    }

    fn shutdown(&mut self) -> Vec<Effect> {
        self.stop()
    }

    fn is_running(&self) -> bool {
        BreathingTimer::is_running(self)
    }

    fn snapshot(&self) -> TimerSnapshot {
        BreathingTimer::snapshot(self)
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

enum Step<C> {
    Command(Option<TimerCommand<C>>),
    Tick,
}

/// Event loop around a single timer.
pub struct TimerEngine<T: PhaseTimer> {
    timer: T,
    ticks: TickSource,
    executor: EffectExecutor,
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl<T: PhaseTimer> TimerEngine<T> {
    /// Creates an engine with a one-second tick source.
    pub fn new(
        timer: T,
        executor: EffectExecutor,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            timer,
            ticks: TickSource::new(),
            executor,
            events,
        }
    }

    /// Replaces the tick source.
    #[must_use]
    pub fn with_tick_source(mut self, ticks: TickSource) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Runs until [`TimerCommand::Shutdown`] arrives or every command
    /// sender is dropped, then returns the timer.
    ///
    /// Pending commands are always handled before a pending tick, so a tick
    /// that was due when a pause arrived is never applied.
    pub async fn run(mut self, mut commands: mpsc::Receiver<TimerCommand<T::Config>>) -> T {
        self.sync_ticks();
        self.publish(TimerEvent::Changed(self.timer.snapshot()));

        loop {
            let step = tokio::select! {
                biased;
                command = commands.recv() => Step::Command(command),
                _ = self.ticks.tick() => Step::Tick,
            };

            match step {
                Step::Command(None) | Step::Command(Some(TimerCommand::Shutdown)) => break,
                Step::Command(Some(command)) => self.handle_command(command),
                Step::Tick => self.handle_tick(),
            }
            self.sync_ticks();
        }

        let effects = self.timer.shutdown();
        self.executor.execute(effects);
        self.ticks.disarm();
        debug!("Timer engine stopped");
        self.timer
    }

    fn handle_command(&mut self, command: TimerCommand<T::Config>) {
        let effects = match command {
            TimerCommand::Start { task } => self.timer.start(task),
            TimerCommand::Pause => self.timer.pause(),
            TimerCommand::Reset => self.timer.reset(),
            TimerCommand::Skip => self.timer.skip(),
            TimerCommand::Reconfigure(config) => match self.timer.reconfigure(config) {
                Ok(()) => Vec::new(),
                Err(e) => {
                    warn!("Configuration rejected: {}", e);
                    vec![Effect::Notify(content::config_rejected(&e))]
                }
            },
            TimerCommand::Shutdown => Vec::new(),
        };
        self.apply(effects, TimerEvent::Changed);
    }

    fn handle_tick(&mut self) {
        if !self.timer.is_running() {
            return;
        }
        let effects = self.timer.tick();
        self.apply(effects, TimerEvent::Tick);
    }

    fn apply(&mut self, effects: Vec<Effect>, event: fn(TimerSnapshot) -> TimerEvent) {
        let completed = self.executor.execute(effects);
        let snapshot = self.timer.snapshot();
        if completed {
            self.publish(TimerEvent::Completed(snapshot));
        } else {
            self.publish(event(snapshot));
        }
    }

    fn sync_ticks(&mut self) {
        if self.timer.is_running() {
            self.ticks.arm();
        } else {
            self.ticks.disarm();
        }
    }

    fn publish(&self, event: TimerEvent) {
        // Nobody listening is not an error; the timer keeps running.
        let _ = self.events.send(event);
    }
}
