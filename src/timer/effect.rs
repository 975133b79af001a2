//! Side effects requested by timer transitions.

use uuid::Uuid;

use crate::notification::Notice;
use crate::store::{Task, TaskId};

/// Points awarded for finishing a breathing session.
pub const BREATHING_POINTS: u32 = 10;

/// Timer-side handle for a session record.
///
/// Minted by the timer when a work phase starts so that the timer never
/// waits for the store to hand out an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    /// Creates a fresh handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// What a work session is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    /// Task list entry, when the session works on one
    pub id: Option<TaskId>,
    pub title: String,
}

impl TaskRef {
    /// A free-text task that is not in the task list.
    pub fn named(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }
}

impl From<&Task> for TaskRef {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.text.clone(),
        }
    }
}

/// Something a transition wants done outside the timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a notice
    Notify(Notice),
    /// Open a session record for the work phase that just started
    OpenSession {
        handle: SessionHandle,
        planned_seconds: u32,
        task: Option<TaskRef>,
    },
    /// Close the session record opened under `handle`
    CloseSession {
        handle: SessionHandle,
        completed: bool,
        interruption_count: u32,
        /// Seconds the countdown ran while the session was open
        focus_seconds: u32,
    },
    /// Add magic points
    AwardPoints(u32),
    /// Log a finished breathing session
    RecordBreathing { pattern: String, cycles: u32 },
    /// Play the completion chime
    PlaySound,
    /// The timer reached its final state and the session is over
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        assert_ne!(SessionHandle::new(), SessionHandle::new());
    }

    #[test]
    fn test_handle_display_is_simple_uuid() {
        let text = SessionHandle::new().to_string();
        assert_eq!(text.len(), 32);
        assert!(!text.contains('-'));
    }

    #[test]
    fn test_task_ref_from_listed_task() {
        let task = Task {
            id: TaskId(3),
            text: "Revisar PR".to_string(),
            completed: false,
            created_at: chrono::Utc::now(),
        };
        let task_ref = TaskRef::from(&task);
        assert_eq!(task_ref.id, Some(TaskId(3)));
        assert_eq!(task_ref.title, "Revisar PR");

        assert_eq!(TaskRef::named("Ler").id, None);
    }
}
