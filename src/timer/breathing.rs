//! Breathing exercise state machine.

use tracing::{debug, info};

use super::effect::{Effect, BREATHING_POINTS};
use super::plan::{advance, BreathingPlan, PhasePlan};
use crate::notification::content;
use crate::types::{BreathingPattern, BreathingPhase, ConfigError, TimerSnapshot};

/// Inhale/hold/exhale countdown for a fixed number of cycles.
#[derive(Debug, Clone)]
pub struct BreathingTimer {
    pattern: BreathingPattern,
    plan: BreathingPlan,
    phase: BreathingPhase,
    remaining_seconds: u32,
    running: bool,
    completed_cycles: u32,
}

impl BreathingTimer {
    /// Creates a stopped timer for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is out of range.
    pub fn new(pattern: BreathingPattern) -> Result<Self, ConfigError> {
        pattern.validate()?;
        let plan = BreathingPlan::new(&pattern);
        let phase = plan.initial_phase();
        let remaining_seconds = plan.duration_of(phase);

        Ok(Self {
            pattern,
            plan,
            phase,
            remaining_seconds,
            running: false,
            completed_cycles: 0,
        })
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn phase(&self) -> BreathingPhase {
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

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase.as_str().to_string(),
            label: self.phase.label().to_string(),
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            completed_cycles: self.completed_cycles,
            total_cycles: Some(self.plan.cycles()),
            interruption_count: None,
            focus_seconds: None,
        }
    }

    /// Starts a fresh session from the first inhale.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.running {
            return Vec::new();
        }
        self.rewind();
        self.completed_cycles = 0;
        self.running = true;
        debug!("Breathing started with pattern {}", self.pattern.id);
        Vec::new()
    }

    /// Abandons the session. No points are awarded.
    pub fn stop(&mut self) -> Vec<Effect> {
        self.running = false;
        self.rewind();
        Vec::new()
    }

    /// Switches to another pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TimerRunning`] while running, or a range error
    /// if `pattern` is invalid.
    pub fn select_pattern(&mut self, pattern: BreathingPattern) -> Result<(), ConfigError> {
        if self.running {
            return Err(ConfigError::TimerRunning);
        }
        pattern.validate()?;

        self.plan = BreathingPlan::new(&pattern);
        self.pattern = pattern;
        self.completed_cycles = 0;
        self.rewind();
        debug!("Breathing pattern set to {}", self.pattern.id);
        Ok(())
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> Vec<Effect> {
        if !self.running {
            return Vec::new();
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Vec::new();
        }

        if self.phase == BreathingPhase::Exhale {
            self.completed_cycles += 1;
            if self.completed_cycles >= self.plan.cycles() {
                return self.finish();
            }
        }

        let (next, duration) = advance(&self.plan, self.phase, self.completed_cycles);
        self.phase = next;
        self.remaining_seconds = duration;
        Vec::new()
    }

    fn finish(&mut self) -> Vec<Effect> {
        self.running = false;
        self.rewind();
        info!(
            "Breathing session finished ({} x {})",
            self.pattern.id, self.completed_cycles
        );

        vec![
            Effect::Notify(content::breathing_complete(BREATHING_POINTS)),
            Effect::AwardPoints(BREATHING_POINTS),
            Effect::RecordBreathing {
                pattern: self.pattern.id.clone(),
                cycles: self.completed_cycles,
            },
            Effect::PlaySound,
            Effect::Completed,
        ]
    }

    fn rewind(&mut self) {
        self.phase = self.plan.initial_phase();
        self.remaining_seconds = self.plan.duration_of(self.phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_n(timer: &mut BreathingTimer, n: u32) -> Vec<Effect> {
        (0..n).flat_map(|_| timer.tick()).collect()
    }

    #[test]
    fn test_initial_state() {
        let timer = BreathingTimer::new(BreathingPattern::four_seven_eight()).unwrap();
        assert_eq!(timer.phase(), BreathingPhase::Inhale);
        assert_eq!(timer.remaining_seconds(), 4);
        assert!(!timer.is_running());
        assert_eq!(timer.snapshot().total_cycles, Some(4));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(BreathingTimer::new(BreathingPattern::custom(4, 0, 4, 0)).is_err());
    }

    #[test]
    fn test_phase_progression() {
        let mut timer = BreathingTimer::new(BreathingPattern::four_seven_eight()).unwrap();
        timer.start();

        tick_n(&mut timer, 4);
        assert_eq!(timer.phase(), BreathingPhase::Hold);
        assert_eq!(timer.remaining_seconds(), 7);

        tick_n(&mut timer, 7);
        assert_eq!(timer.phase(), BreathingPhase::Exhale);
        assert_eq!(timer.remaining_seconds(), 8);

        tick_n(&mut timer, 8);
        assert_eq!(timer.phase(), BreathingPhase::Inhale);
        assert_eq!(timer.completed_cycles(), 1);
    }

    #[test]
    fn test_zero_hold_skipped_in_same_tick() {
        let mut timer = BreathingTimer::new(BreathingPattern::energizing()).unwrap();
        timer.start();

        tick_n(&mut timer, 6);
        assert_eq!(timer.phase(), BreathingPhase::Exhale);
        assert_eq!(timer.remaining_seconds(), 2);
    }

    #[test]
    fn test_scenario_full_session() {
        let mut timer = BreathingTimer::new(BreathingPattern::four_seven_eight()).unwrap();
        timer.start();

        let effects = tick_n(&mut timer, 19 * 4);

        assert!(!timer.is_running());
        assert_eq!(timer.completed_cycles(), 4);
        assert_eq!(timer.phase(), BreathingPhase::Inhale);

        let notices = effects
            .iter()
            .filter(|e| matches!(e, Effect::Notify(_)))
            .count();
        assert_eq!(notices, 1);
        assert_eq!(
            effects
                .iter()
                .filter(|e| matches!(e, Effect::AwardPoints(10)))
                .count(),
            1
        );
        assert!(effects.contains(&Effect::RecordBreathing {
            pattern: "4-7-8".to_string(),
            cycles: 4,
        }));
        assert!(effects.contains(&Effect::Completed));

        // Further ticks do nothing
        assert!(tick_n(&mut timer, 100).is_empty());
    }

    #[test]
    fn test_stop_awards_nothing() {
        let mut timer = BreathingTimer::new(BreathingPattern::square()).unwrap();
        timer.start();
        tick_n(&mut timer, 20);
        assert!(timer.stop().is_empty());

        assert!(!timer.is_running());
        assert_eq!(timer.phase(), BreathingPhase::Inhale);
        assert_eq!(timer.remaining_seconds(), 4);
    }

    #[test]
    fn test_start_is_idempotent_and_restart_is_fresh() {
        let mut timer = BreathingTimer::new(BreathingPattern::square()).unwrap();
        timer.start();
        tick_n(&mut timer, 13);
        assert_eq!(timer.completed_cycles(), 1);

        timer.start();
        assert_eq!(timer.completed_cycles(), 1);

        timer.stop();
        timer.start();
        assert_eq!(timer.completed_cycles(), 0);
        assert_eq!(timer.remaining_seconds(), 4);
    }

    #[test]
    fn test_select_pattern() {
        let mut timer = BreathingTimer::new(BreathingPattern::default()).unwrap();
        timer.select_pattern(BreathingPattern::energizing()).unwrap();
        assert_eq!(timer.pattern().id, "energizante");
        assert_eq!(timer.remaining_seconds(), 6);

        timer.start();
        assert_eq!(
            timer.select_pattern(BreathingPattern::square()),
            Err(ConfigError::TimerRunning)
        );
    }
}
