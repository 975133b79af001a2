//! Runs the effects produced by timer transitions.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::effect::Effect;
use super::recorder::RecorderHandle;
use crate::notification::{content, Notifier};
use crate::sound::{SoundPlayer, SoundSource};
use crate::store::{BreathingLog, NewSession, ProgressLedger, SessionClose};

/// Dispatches [`Effect`]s to the injected collaborators.
///
/// Collaborator failures are logged and turned into error notices; they
/// never reach the timer.
pub struct EffectExecutor {
    notifier: Arc<dyn Notifier>,
    recorder: Option<RecorderHandle>,
    ledger: Option<Arc<dyn ProgressLedger>>,
    sound: Option<Box<dyn SoundPlayer>>,
    sound_source: SoundSource,
}

impl EffectExecutor {
    /// Creates an executor that only delivers notices.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            recorder: None,
            ledger: None,
            sound: None,
            sound_source: SoundSource::Chime,
        }
    }

    #[must_use]
    pub fn with_recorder(mut self, recorder: RecorderHandle) -> Self {
        self.recorder = Some(recorder);
        self
    }

    #[must_use]
    pub fn with_ledger(mut self, ledger: Arc<dyn ProgressLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    #[must_use]
    pub fn with_sound(mut self, player: Box<dyn SoundPlayer>, source: SoundSource) -> Self {
        self.sound = Some(player);
        self.sound_source = source;
        self
    }

    /// Runs `effects` in order. Returns true if the session completed.
    pub fn execute(&self, effects: Vec<Effect>) -> bool {
        let mut finished = false;
        for effect in effects {
            match effect {
                Effect::Notify(notice) => self.notifier.notify(notice),
                Effect::OpenSession {
                    handle,
                    planned_seconds,
                    task,
                } => match &self.recorder {
                    Some(recorder) => {
                        let (task_id, task) = match task {
                            Some(task) => (task.id, Some(task.title)),
                            None => (None, None),
                        };
                        recorder.open(
                            handle,
                            NewSession {
                                started_at: Utc::now(),
                                planned_seconds,
                                task,
                                task_id,
                            },
                        );
                    }
                    None => debug!("No recorder; session {} not persisted", handle),
                },
                Effect::CloseSession {
                    handle,
                    completed,
                    interruption_count,
                    focus_seconds,
                } => {
                    if let Some(recorder) = &self.recorder {
                        recorder.close(
                            handle,
                            SessionClose {
                                ended_at: Utc::now(),
                                completed,
                                interruption_count,
                                focus_seconds,
                            },
                        );
                    }
                }
                Effect::AwardPoints(amount) => self.award_points(amount),
                Effect::RecordBreathing { pattern, cycles } => {
                    self.record_breathing(BreathingLog {
                        finished_at: Utc::now(),
                        pattern,
                        cycles,
                    });
                }
                Effect::PlaySound => self.play_sound(),
                Effect::Completed => finished = true,
            }
        }
        finished
    }

    fn award_points(&self, amount: u32) {
        let Some(ledger) = &self.ledger else {
            debug!("No ledger; {} points not awarded", amount);
            return;
        };
        match ledger.add_points(amount) {
            Ok(total) => debug!("Awarded {} points (total: {})", amount, total),
            Err(e) => {
                warn!("Failed to award points: {}", e);
                self.notifier
                    .notify(content::persistence_failed("adicionar pontos", &e));
            }
        }
    }

    fn record_breathing(&self, log: BreathingLog) {
        let Some(ledger) = &self.ledger else {
            return;
        };
        if let Err(e) = ledger.record_breathing(log) {
            warn!("Failed to record breathing session: {}", e);
            self.notifier
                .notify(content::persistence_failed("registrar respiração", &e));
        }
    }

    fn play_sound(&self) {
        if let Some(player) = &self.sound {
            if let Err(e) = player.play(&self.sound_source) {
                warn!("Failed to play sound: {} ({})", e, e.suggestion());
            }
        }
    }
}

impl std::fmt::Debug for EffectExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectExecutor")
            .field("recorder", &self.recorder.is_some())
            .field("ledger", &self.ledger.is_some())
            .field("sound", &self.sound.is_some())
            .finish()
    }
}
