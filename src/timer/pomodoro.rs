//! Pomodoro timer state machine.
//!
//! Every operation mutates the state in place and returns the effects it
//! wants executed. Nothing here performs I/O, so every transition can be
//! tested by calling it and inspecting the result.

use tracing::debug;

use super::effect::{Effect, SessionHandle, TaskRef};
use super::plan::{advance, PhasePlan, PomodoroPlan};
use crate::notification::content;
use crate::types::{ConfigError, PomodoroConfig, PomodoroPhase, TimerSnapshot};

/// Work/break countdown with session tracking.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    plan: PomodoroPlan,
    phase: PomodoroPhase,
    remaining_seconds: u32,
    running: bool,
    completed_cycles: u32,
    interruption_count: u32,
    focus_seconds: u32,
    session_focus_seconds: u32,
    task: Option<TaskRef>,
    session: Option<SessionHandle>,
}

impl PomodoroTimer {
    /// Creates a stopped timer at the start of a work phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range.
    pub fn new(config: PomodoroConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let plan = PomodoroPlan::new(&config);
        let phase = plan.initial_phase();
        let remaining_seconds = plan.duration_of(phase);

        Ok(Self {
            config,
            plan,
            phase,
            remaining_seconds,
            running: false,
            completed_cycles: 0,
            interruption_count: 0,
            focus_seconds: 0,
            session_focus_seconds: 0,
            task: None,
            session: None,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Pauses during the current work phase.
    pub fn interruption_count(&self) -> u32 {
        self.interruption_count
    }

    /// Seconds spent running in work phases.
    pub fn focus_seconds(&self) -> u32 {
        self.focus_seconds
    }

    pub fn task(&self) -> Option<&TaskRef> {
        self.task.as_ref()
    }

    /// Returns true while a session record is open for the current work phase.
    pub fn has_open_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase.as_str().to_string(),
            label: self.phase.label().to_string(),
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            completed_cycles: self.completed_cycles,
            total_cycles: None,
            interruption_count: Some(self.interruption_count),
            focus_seconds: Some(self.focus_seconds),
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts or resumes the countdown.
    ///
    /// A `task` replaces the current task label; `None` keeps it.
    pub fn start(&mut self, task: Option<TaskRef>) -> Vec<Effect> {
        if self.running {
            return Vec::new();
        }
        if task.is_some() {
            self.task = task;
        }

        self.running = true;
        debug!(
            "Pomodoro started in {} ({}s left)",
            self.phase.as_str(),
            self.remaining_seconds
        );

        let mut effects = Vec::new();
        self.open_session_if_work(&mut effects);
        effects
    }

    /// Stops the countdown, counting an interruption during work.
    pub fn pause(&mut self) -> Vec<Effect> {
        if !self.running {
            return Vec::new();
        }
        self.running = false;

        if self.phase != PomodoroPhase::Work {
            return Vec::new();
        }
        self.interruption_count += 1;
        debug!("Work paused (interruptions: {})", self.interruption_count);
        vec![Effect::Notify(content::timer_paused())]
    }

    /// Stops and returns to the start of a work phase.
    ///
    /// An open session is closed as not completed. Cycle and focus tallies
    /// are kept.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.running = false;
        let effects = self.close_open_session();
        self.interruption_count = 0;
        self.phase = PomodoroPhase::Work;
        self.remaining_seconds = self.plan.duration_of(PomodoroPhase::Work);
        debug!("Pomodoro reset");
        effects
    }

    /// Ends a running break early.
    pub fn skip(&mut self) -> Vec<Effect> {
        if !self.running || !self.phase.is_break() {
            return Vec::new();
        }

        self.phase = PomodoroPhase::Work;
        self.remaining_seconds = self.plan.duration_of(PomodoroPhase::Work);
        debug!("Break skipped");

        let mut effects = vec![Effect::Notify(content::break_skipped())];
        if self.config.auto_cycle {
            self.open_session_if_work(&mut effects);
        } else {
            self.running = false;
        }
        effects
    }

    /// Replaces the configuration.
    ///
    /// A work phase paused mid-session must be reset first, so every
    /// session record keeps the plan it was opened with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TimerRunning`] while running,
    /// [`ConfigError::SessionOpen`] while a session is open, or a range
    /// error if `config` is invalid. The timer is unchanged on error.
    pub fn reconfigure(&mut self, config: PomodoroConfig) -> Result<(), ConfigError> {
        if self.running {
            return Err(ConfigError::TimerRunning);
        }
        if self.session.is_some() {
            return Err(ConfigError::SessionOpen);
        }
        config.validate()?;

        self.plan = PomodoroPlan::new(&config);
        self.config = config;
        self.remaining_seconds = self.plan.duration_of(self.phase);
        debug!("Pomodoro reconfigured: {:?}", self.config);
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero completes the phase within the same call.
    pub fn tick(&mut self) -> Vec<Effect> {
        if !self.running {
            return Vec::new();
        }

        if self.phase == PomodoroPhase::Work {
            self.focus_seconds = self.focus_seconds.saturating_add(1);
            self.session_focus_seconds = self.session_focus_seconds.saturating_add(1);
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Vec::new();
        }

        self.complete_phase()
    }

    /// Closes any open session before the timer goes away.
    pub fn shutdown(&mut self) -> Vec<Effect> {
        self.running = false;
        self.close_open_session()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn complete_phase(&mut self) -> Vec<Effect> {
        let finished = self.phase;
        let mut effects = Vec::new();

        if finished == PomodoroPhase::Work {
            self.completed_cycles += 1;
            if let Some(handle) = self.session.take() {
                effects.push(Effect::CloseSession {
                    handle,
                    completed: true,
                    interruption_count: self.interruption_count,
                    focus_seconds: self.session_focus_seconds,
                });
            }
            self.session_focus_seconds = 0;
            self.interruption_count = 0;
            effects.push(Effect::Notify(content::focus_complete()));
        } else {
            effects.push(Effect::Notify(content::back_to_focus()));
        }

        let (next, duration) = advance(&self.plan, finished, self.completed_cycles);
        if next == PomodoroPhase::LongBreak {
            effects.push(Effect::Notify(content::long_break(self.completed_cycles)));
        }
        effects.push(Effect::PlaySound);

        debug!(
            "{} finished, next {} ({}s, cycles: {})",
            finished.as_str(),
            next.as_str(),
            duration,
            self.completed_cycles
        );
        self.phase = next;
        self.remaining_seconds = duration;

        if self.config.auto_cycle {
            self.open_session_if_work(&mut effects);
        } else {
            self.running = false;
        }
        effects
    }

    fn open_session_if_work(&mut self, effects: &mut Vec<Effect>) {
        if self.phase != PomodoroPhase::Work || self.session.is_some() {
            return;
        }
        let handle = SessionHandle::new();
        self.session = Some(handle);
        self.session_focus_seconds = 0;
        effects.push(Effect::OpenSession {
            handle,
            planned_seconds: self.plan.duration_of(PomodoroPhase::Work),
            task: self.task.clone(),
        });
    }

    fn close_open_session(&mut self) -> Vec<Effect> {
        match self.session.take() {
            Some(handle) => vec![Effect::CloseSession {
                handle,
                completed: false,
                interruption_count: self.interruption_count,
                focus_seconds: std::mem::take(&mut self.session_focus_seconds),
            }],
            None => Vec::new(),
        }
    }
}
