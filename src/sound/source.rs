//! Sound sources for the completion chime.

use std::path::{Path, PathBuf};

/// What to play when a phase completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file chosen by the user (WAV, MP3, FLAC, OGG).
    File {
        /// Full path to the sound file.
        path: PathBuf,
    },
    /// The built-in two-note chime, synthesized at play time.
    Chime,
}

impl SoundSource {
    /// Creates a file source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Picks the configured file, or the chime when none is set.
    #[must_use]
    pub fn from_setting(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::file(path),
            None => Self::Chime,
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Chime => "chime".to_string(),
        }
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Chime => None,
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::Chime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_setting() {
        assert_eq!(SoundSource::from_setting(None), SoundSource::Chime);

        let source = SoundSource::from_setting(Some(Path::new("/tmp/bell.wav")));
        assert_eq!(source.path(), Some(Path::new("/tmp/bell.wav")));
    }

    #[test]
    fn test_name() {
        assert_eq!(SoundSource::Chime.name(), "chime");
        assert_eq!(SoundSource::file("/a/b/bell.ogg").name(), "bell.ogg");
    }

    #[test]
    fn test_default_is_chime() {
        assert_eq!(SoundSource::default(), SoundSource::Chime);
        assert!(SoundSource::default().path().is_none());
    }
}
