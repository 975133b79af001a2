//! Sound player implementation using rodio.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// Notes of the built-in chime: (frequency in Hz, length in ms).
const CHIME_NOTES: [(f32, u64); 2] = [(880.0, 160), (1320.0, 260)];

/// Chime volume relative to full scale.
const CHIME_VOLUME: f32 = 0.2;

/// A sound player backed by the default audio output.
///
/// Playback is non-blocking: each sound gets its own detached sink. The
/// output stream is not `Send`, so the player stays on the thread that
/// created it.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays `source`. A file that cannot be played falls back to the chime.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the file nor the chime could be played.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { path } => match self.play_file(path) {
                Err(e) if e.should_fallback_to_chime() => {
                    warn!(
                        "Failed to play '{}': {}, falling back to chime",
                        source.name(),
                        e
                    );
                    self.play_chime()
                }
                result => result,
            },
            SoundSource::Chime => self.play_chime(),
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.detach();

        debug!("Playing sound file {}", path.display());
        Ok(())
    }

    fn play_chime(&self) -> Result<(), SoundError> {
        let sink = self.sink()?;
        for (frequency, millis) in CHIME_NOTES {
            sink.append(
                SineWave::new(frequency)
                    .take_duration(Duration::from_millis(millis))
                    .amplify(CHIME_VOLUME),
            );
        }
        sink.detach();

        debug!("Playing chime");
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Opens a player, or returns `None` (with a warning) when audio is unavailable.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
