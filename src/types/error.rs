//! Configuration error types.
//!
//! Plans are validated before a timer is started so that no phase can end up
//! with a duration the countdown can never reach.

use thiserror::Error;

/// Errors raised while validating or applying a timer configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration is outside its allowed range.
    #[error("{field} deve estar entre {min} e {max} (recebido: {value})")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A breathing pattern name is empty or unknown.
    #[error("padrão de respiração desconhecido: '{0}'")]
    UnknownPattern(String),

    /// The configuration cannot change while the timer is counting down.
    #[error("não é possível alterar a configuração com o timer em andamento")]
    TimerRunning,

    /// A paused work phase still has an open session record.
    #[error("não é possível alterar a configuração com uma sessão de foco em aberto")]
    SessionOpen,
}

impl ConfigError {
    /// Shorthand for an out-of-range error.
    pub(crate) fn out_of_range(field: &'static str, value: u32, min: u32, max: u32) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// Returns true if waiting for the timer to stop would resolve the error.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TimerRunning | Self::SessionOpen)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "verifique os valores informados",
            Self::UnknownPattern(_) => "use `foco patterns` para ver os padrões disponíveis",
            Self::TimerRunning => "pause ou reinicie o timer antes de mudar a configuração",
            Self::SessionOpen => "reinicie o timer para encerrar a sessão atual",
        }
    }
}
