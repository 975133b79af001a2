//! Phase plans and the phase sequencer.
//!
//! A plan maps every phase of a mode to a duration and a successor. The
//! sequencer walks successors, skipping zero-duration phases, so a timer
//! never shows a phase it cannot count down.

use crate::types::{BreathingPattern, BreathingPhase, PomodoroConfig, PomodoroPhase};

/// An immutable table of phases for one timer mode.
pub trait PhasePlan {
    /// Phase identifier for this mode.
    type Phase: Copy + Eq + std::fmt::Debug;

    /// Phase a fresh timer starts in.
    fn initial_phase(&self) -> Self::Phase;

    /// Duration of `phase`, in seconds.
    fn duration_of(&self, phase: Self::Phase) -> u32;

    /// Phase that follows `phase`, given the cycles completed so far.
    fn successor(&self, phase: Self::Phase, completed_cycles: u32) -> Self::Phase;

    /// Number of distinct phases in the plan.
    fn phase_count(&self) -> usize;
}

/// Returns the next phase with a non-zero duration, and that duration.
///
/// Zero-duration phases are skipped without consuming a tick. The walk is
/// bounded by the number of phases, so it terminates for any plan; for a
/// validated plan the returned duration is always positive.
pub fn advance<P: PhasePlan>(
    plan: &P,
    phase: P::Phase,
    completed_cycles: u32,
) -> (P::Phase, u32) {
    let mut next = plan.successor(phase, completed_cycles);
    for _ in 0..plan.phase_count() {
        let duration = plan.duration_of(next);
        if duration > 0 {
            return (next, duration);
        }
        next = plan.successor(next, completed_cycles);
    }
    (next, plan.duration_of(next))
}

// ============================================================================
// PomodoroPlan
// ============================================================================

/// Phase plan derived from a [`PomodoroConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroPlan {
    work_seconds: u32,
    short_break_seconds: u32,
    long_break_seconds: u32,
    sessions_until_long_break: u32,
}

impl PomodoroPlan {
    /// Builds the plan. The config is expected to be validated.
    pub fn new(config: &PomodoroConfig) -> Self {
        Self {
            work_seconds: config.work_minutes * 60,
            short_break_seconds: config.short_break_minutes * 60,
            long_break_seconds: config.long_break_minutes * 60,
            sessions_until_long_break: config.sessions_until_long_break.max(1),
        }
    }

    /// Completed work phases between long breaks.
    pub fn sessions_until_long_break(&self) -> u32 {
        self.sessions_until_long_break
    }
}

impl PhasePlan for PomodoroPlan {
    type Phase = PomodoroPhase;

    fn initial_phase(&self) -> PomodoroPhase {
        PomodoroPhase::Work
    }

    fn duration_of(&self, phase: PomodoroPhase) -> u32 {
        match phase {
            PomodoroPhase::Work => self.work_seconds,
            PomodoroPhase::ShortBreak => self.short_break_seconds,
            PomodoroPhase::LongBreak => self.long_break_seconds,
        }
    }

    fn successor(&self, phase: PomodoroPhase, completed_cycles: u32) -> PomodoroPhase {
        match phase {
            PomodoroPhase::Work => {
                if completed_cycles > 0 && completed_cycles % self.sessions_until_long_break == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Work,
        }
    }

    fn phase_count(&self) -> usize {
        PomodoroPhase::ALL.len()
    }
}

// ============================================================================
// BreathingPlan
// ============================================================================

/// Phase plan derived from a [`BreathingPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathingPlan {
    inhale: u32,
    hold: u32,
    exhale: u32,
    cycles: u32,
}

impl BreathingPlan {
    /// Builds the plan. The pattern is expected to be validated.
    pub fn new(pattern: &BreathingPattern) -> Self {
        Self {
            inhale: pattern.inhale,
            hold: pattern.hold,
            exhale: pattern.exhale,
            cycles: pattern.cycles,
        }
    }

    /// Cycles that make up a full session.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}

impl PhasePlan for BreathingPlan {
    type Phase = BreathingPhase;

    fn initial_phase(&self) -> BreathingPhase {
        BreathingPhase::Inhale
    }

    fn duration_of(&self, phase: BreathingPhase) -> u32 {
        match phase {
            BreathingPhase::Inhale => self.inhale,
            BreathingPhase::Hold => self.hold,
            BreathingPhase::Exhale => self.exhale,
        }
    }

    fn successor(&self, phase: BreathingPhase, _completed_cycles: u32) -> BreathingPhase {
        match phase {
            BreathingPhase::Inhale => BreathingPhase::Hold,
            BreathingPhase::Hold => BreathingPhase::Exhale,
            BreathingPhase::Exhale => BreathingPhase::Inhale,
        }
    }

    fn phase_count(&self) -> usize {
        BreathingPhase::ALL.len()
    }
}
