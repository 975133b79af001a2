//! Sound system error types.

use thiserror::Error;

/// Errors that can occur while playing the completion sound.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device (headless machine, container).
    #[error("dispositivo de áudio indisponível: {0}")]
    DeviceNotAvailable(String),

    /// The configured sound file does not exist or cannot be read.
    #[error("arquivo de som não encontrado: {0}")]
    FileNotFound(String),

    /// The sound file is not in a supported format.
    #[error("falha ao decodificar o arquivo de som: {0}")]
    DecodeError(String),

    /// Failed to open a playback sink.
    #[error("falha ao criar o fluxo de áudio: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("erro na reprodução do som: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if playback should fall back to the built-in chime.
    #[must_use]
    pub fn should_fallback_to_chime(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "conecte um dispositivo de áudio ou use --no-sound",
            Self::FileNotFound(_) => "verifique o caminho em sound.path nas configurações",
            Self::DecodeError(_) => "use um arquivo WAV, MP3, FLAC ou OGG",
            Self::StreamError(_) => "verifique as configurações de áudio do sistema",
            Self::PlaybackError(_) => "reinicie o aplicativo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::FileNotFound("/x/bell.wav".to_string());
        assert!(err.to_string().contains("/x/bell.wav"));

        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_chime() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_chime());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_chime());
        assert!(!SoundError::StreamError("x".into()).should_fallback_to_chime());
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::DeviceNotAvailable("x".into())
            .suggestion()
            .contains("--no-sound"));
        assert!(SoundError::FileNotFound("x".into())
            .suggestion()
            .contains("sound.path"));
    }
}
