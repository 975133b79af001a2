//! Persistence error types.

use thiserror::Error;

/// Errors raised by session and progress stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write the store file.
    #[error("falha ao acessar o armazenamento: {0}")]
    Io(#[from] std::io::Error),

    /// The store file could not be parsed or serialized.
    #[error("dados armazenados inválidos: {0}")]
    Corrupted(#[from] serde_json::Error),

    /// The session id is not known to the store.
    #[error("sessão {0} não encontrada")]
    UnknownSession(u64),

    /// The session was already closed.
    #[error("sessão {0} já foi encerrada")]
    AlreadyClosed(u64),

    /// The task id is not in the task list.
    #[error("tarefa {0} não encontrada")]
    UnknownTask(u64),

    /// The task text is blank.
    #[error("o texto da tarefa não pode ficar vazio")]
    EmptyTask,

    /// The backend refused or could not be reached.
    #[error("armazenamento indisponível: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true if retrying the same call later might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io(_) => "verifique as permissões do diretório de dados",
            Self::Corrupted(_) => "faça backup e remova o arquivo store.json",
            Self::UnknownSession(_) | Self::AlreadyClosed(_) => {
                "a sessão será ignorada; nenhuma ação necessária"
            }
            Self::UnknownTask(_) => "use `foco tasks` para ver os ids disponíveis",
            Self::EmptyTask => "informe um texto, por exemplo: foco tasks add \"Revisar PR\"",
            Self::Unavailable(_) => "tente novamente mais tarde",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(StoreError::UnknownSession(7).to_string().contains('7'));
        assert!(StoreError::AlreadyClosed(3).to_string().contains("encerrada"));
        assert!(StoreError::Unavailable("offline".into())
            .to_string()
            .contains("offline"));
    }

    #[test]
    fn test_is_transient() {
        assert!(StoreError::Unavailable("x".into()).is_transient());
        assert!(StoreError::Io(std::io::Error::other("x")).is_transient());
        assert!(!StoreError::UnknownSession(1).is_transient());
        assert!(!StoreError::AlreadyClosed(1).is_transient());
        assert!(!StoreError::UnknownTask(1).is_transient());
    }

    #[test]
    fn test_suggestion() {
        assert!(StoreError::Unavailable("x".into())
            .suggestion()
            .contains("mais tarde"));
        assert!(StoreError::UnknownTask(4).suggestion().contains("foco tasks"));
    }
}
