//! Completion sound playback.
//!
//! The timers ask for a sound through [`SoundPlayer`]; the CLI passes a
//! [`RodioSoundPlayer`] when an audio device is present, or nothing at all.
//! Playback failures are never fatal.

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::SoundSource;

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a sound without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(source.clone());
        Ok(())
    }
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for std::sync::Arc<P> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        (**self).play(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let mock = MockSoundPlayer::new();
        mock.play(&SoundSource::Chime).unwrap();
        mock.play(&SoundSource::file("/tmp/a.wav")).unwrap();

        assert_eq!(mock.play_count(), 2);
        assert_eq!(mock.get_play_calls()[0], SoundSource::Chime);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockSoundPlayer::new();
        mock.set_should_fail(true);
        assert!(mock.play(&SoundSource::Chime).is_err());
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_shared_player_delegates() {
        let mock = std::sync::Arc::new(MockSoundPlayer::new());
        let boxed: Box<dyn SoundPlayer> = Box::new(mock.clone());
        boxed.play(&SoundSource::Chime).unwrap();
        assert_eq!(mock.play_count(), 1);
    }
}
