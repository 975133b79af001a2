//! Keyboard controls for the interactive timers.
//!
//! Controls are read one line at a time from stdin, so they work in any
//! terminal without raw mode.

use crate::timer::{TaskRef, TimerCommand};

/// A control typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Reset,
    Skip,
    Quit,
    Help,
}

impl Control {
    /// Every control, in help order.
    pub const ALL: [Control; 6] = [
        Self::Start,
        Self::Pause,
        Self::Reset,
        Self::Skip,
        Self::Quit,
        Self::Help,
    ];

    /// Parses one input line. Accepts the key letter or the word, in
    /// Portuguese or English.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "s" | "start" | "iniciar" | "continuar" => Some(Self::Start),
            "p" | "pause" | "pausar" => Some(Self::Pause),
            "r" | "reset" | "reiniciar" => Some(Self::Reset),
            "k" | "skip" | "pular" => Some(Self::Skip),
            "q" | "quit" | "sair" => Some(Self::Quit),
            "h" | "?" | "help" | "ajuda" => Some(Self::Help),
            _ => None,
        }
    }

    /// Key letter shown in the help line.
    pub fn key(&self) -> char {
        match self {
            Self::Start => 's',
            Self::Pause => 'p',
            Self::Reset => 'r',
            Self::Skip => 'k',
            Self::Quit => 'q',
            Self::Help => '?',
        }
    }

    /// Description shown in the help line.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Start => "iniciar",
            Self::Pause => "pausar",
            Self::Reset => "reiniciar",
            Self::Skip => "pular pausa",
            Self::Quit => "sair",
            Self::Help => "ajuda",
        }
    }

    /// The engine command for this control, if any.
    ///
    /// `task` is attached to [`Control::Start`].
    pub fn to_command<C>(self, task: Option<TaskRef>) -> Option<TimerCommand<C>> {
        match self {
            Self::Start => Some(TimerCommand::Start { task }),
            Self::Pause => Some(TimerCommand::Pause),
            Self::Reset => Some(TimerCommand::Reset),
            Self::Skip => Some(TimerCommand::Skip),
            Self::Quit => Some(TimerCommand::Shutdown),
            Self::Help => None,
        }
    }
}
