//! Notification system error types.

use thiserror::Error;

/// Errors that can occur while loading or saving the notification list.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to read or write the notification file.
    #[error("falha ao acessar o arquivo de notificações: {0}")]
    Io(#[from] std::io::Error),

    /// The notification file is not valid JSON.
    #[error("arquivo de notificações inválido: {0}")]
    Corrupted(#[from] serde_json::Error),
}

impl NotificationError {
    /// Returns true if discarding the stored list would resolve this error.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupted(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io(_) => "verifique as permissões do diretório de dados",
            Self::Corrupted(_) => "execute `foco notifications --clear` para recriar a lista",
        }
    }
}
