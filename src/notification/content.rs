//! Standard notices emitted by the timers.

use super::{NotificationKind, Notice};

/// Route opened when the user acts on a completion notice.
pub const DASHBOARD_ACTION: &str = "/dashboard";

/// Work phase finished naturally.
pub fn focus_complete() -> Notice {
    Notice::new(
        NotificationKind::Success,
        "Sessão de foco concluída!",
        "Hora de fazer uma pausa. Você merece!",
    )
    .with_action(DASHBOARD_ACTION)
}

/// A long break was selected after `sessions` work phases.
pub fn long_break(sessions: u32) -> Notice {
    Notice::new(
        NotificationKind::Info,
        "Pausa longa",
        format!(
            "Você completou {} sessões! Aproveite uma pausa mais longa.",
            sessions
        ),
    )
}

/// A break finished and the work phase is next.
pub fn back_to_focus() -> Notice {
    Notice::new(
        NotificationKind::Reminder,
        "Voltar ao foco",
        "Sua pausa terminou. Vamos voltar ao trabalho?",
    )
}

/// The timer was paused during a work phase.
pub fn timer_paused() -> Notice {
    Notice::new(
        NotificationKind::Warning,
        "Timer pausado",
        "Lembre-se: manter o foco é importante para sua produtividade.",
    )
}

/// A break was skipped.
pub fn break_skipped() -> Notice {
    Notice::new(
        NotificationKind::Warning,
        "Pausa pulada",
        "Não se esqueça de fazer pausas regularmente para manter sua produtividade!",
    )
}

/// A breathing session reached its last cycle.
pub fn breathing_complete(points: u32) -> Notice {
    Notice::new(
        NotificationKind::Success,
        "Exercício de respiração concluído",
        format!("Parabéns! Você ganhou +{} Pontos Mágicos", points),
    )
    .with_action(DASHBOARD_ACTION)
}

/// A collaborator call failed; the timer carried on regardless.
pub fn persistence_failed(what: &str, error: &dyn std::fmt::Display) -> Notice {
    Notice::new(
        NotificationKind::Error,
        format!("Erro ao {}", what),
        format!("{}. O timer continua normalmente.", error),
    )
}

/// A configuration change was refused.
pub fn config_rejected(error: &dyn std::fmt::Display) -> Notice {
    Notice::new(
        NotificationKind::Error,
        "Configuração não aplicada",
        error.to_string(),
    )
}
