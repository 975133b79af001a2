//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ConfigError;

/// Errors raised while loading user settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("falha ao ler {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`Settings`](super::Settings).
    #[error("configuração inválida em {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range or names an unknown pattern.
    #[error(transparent)]
    Invalid(#[from] ConfigError),

    /// No configuration directory could be determined.
    #[error("diretório de configuração não encontrado")]
    NoConfigDir,

    /// No data directory could be determined.
    #[error("diretório de dados não encontrado")]
    NoDataDir,
}

impl SettingsError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "verifique as permissões do arquivo de configuração",
            Self::Parse { .. } => "corrija o JSON ou remova o arquivo para usar os padrões",
            Self::Invalid(e) => e.suggestion(),
            Self::NoConfigDir => "defina FOCO_CONFIG com o caminho do arquivo",
            Self::NoDataDir => "defina FOCO_DATA_DIR com um diretório gravável",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let err = SettingsError::Io {
            path: PathBuf::from("/etc/foco.json"),
            source: std::io::Error::other("denied"),
        };
        let text = err.to_string();
        assert!(text.contains("/etc/foco.json"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_invalid_is_transparent() {
        let inner = ConfigError::UnknownPattern("zen".to_string());
        let err = SettingsError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.suggestion(), inner.suggestion());
    }

    #[test]
    fn test_suggestion_names_env_vars() {
        assert!(SettingsError::NoConfigDir.suggestion().contains("FOCO_CONFIG"));
        assert!(SettingsError::NoDataDir.suggestion().contains("FOCO_DATA_DIR"));
    }
}
