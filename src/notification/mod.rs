//! User-facing notifications.
//!
//! The timers never talk to a global notification list. They receive a
//! [`Notifier`] at construction and hand it [`Notice`]s; what happens next
//! (storing, printing, persisting) is up to the implementation.
//!
//! - [`NotificationCenter`]: newest-first list capped at 50 entries,
//!   optionally persisted to a JSON file, with listener channels
//! - [`MockNotifier`]: records notices for tests

mod center;
pub mod content;
pub mod error;

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

pub use self::center::{Notification, NotificationCenter, MAX_NOTIFICATIONS};
pub use self::error::NotificationError;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something finished well
    Success,
    /// The user did something worth a gentle nudge
    Warning,
    /// Neutral information
    Info,
    /// A call to action
    Reminder,
    /// A collaborator failed
    Error,
}

impl NotificationKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Error => "error",
        }
    }
}

/// A notice to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Route to open when the notice is acted upon
    pub action: Option<String>,
}

impl Notice {
    /// Creates a notice without an action.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action: None,
        }
    }

    /// Attaches an action route.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Fire-and-forget sink for notices.
pub trait Notifier: Send + Sync {
    /// Delivers a notice. Implementations must not fail or block for long.
    fn notify(&self, notice: Notice);
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Returns the titles of every notice received so far.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.title).collect()
    }

    #[must_use]
    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    pub fn reset(&self) {
        self.notices.lock().unwrap().clear();
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
