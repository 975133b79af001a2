//! Persistence collaborators.
//!
//! The timer core only sees two narrow traits:
//! - [`SessionStore`]: opens and closes one record per work phase
//! - [`ProgressLedger`]: awards magic points and logs breathing sessions
//!
//! [`JsonStore`] implements both over a single JSON file in the data
//! directory, and also keeps the user's task list. The `Mock*` types record calls and can be told to fail.

mod error;
mod json;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::error::StoreError;
pub use self::json::{JsonStore, StoreState, STORE_FILE_NAME};

/// Identifier assigned by a store to a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an entry in the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entry in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Data needed to open a session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub started_at: DateTime<Utc>,
    pub planned_seconds: u32,
    pub task: Option<String>,
    /// Task list entry the session works on
    pub task_id: Option<TaskId>,
}

/// Data needed to close a session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClose {
    pub ended_at: DateTime<Utc>,
    pub completed: bool,
    pub interruption_count: u32,
    /// Seconds the timer actually ran during the phase
    pub focus_seconds: u32,
}

/// A persisted work-phase attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Planned length of the work phase, in seconds
    pub planned_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub was_completed: bool,
    pub interruption_count: u32,
    /// Seconds the timer ran before the record was closed; pauses excluded
    #[serde(default)]
    pub focus_seconds: u32,
}

impl SessionRecord {
    /// Returns true while the record has not been closed.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Counted focus time, capped at the planned length.
    ///
    /// Open records count as zero.
    pub fn focus_seconds(&self) -> u32 {
        if self.is_open() {
            return 0;
        }
        self.focus_seconds.min(self.planned_seconds)
    }
}

/// A finished breathing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingLog {
    pub finished_at: DateTime<Utc>,
    pub pattern: String,
    pub cycles: u32,
}

/// Creates and closes session records.
pub trait SessionStore: Send + Sync {
    /// Opens a record and returns its id.
    fn open_session(&self, session: NewSession) -> Result<SessionId, StoreError>;

    /// Closes a previously opened record.
    fn close_session(&self, id: SessionId, close: SessionClose) -> Result<(), StoreError>;
}

/// Tracks magic points and wellness activity.
pub trait ProgressLedger: Send + Sync {
    /// Adds points and returns the new total.
    fn add_points(&self, amount: u32) -> Result<u64, StoreError>;

    /// Logs a finished breathing session.
    fn record_breathing(&self, log: BreathingLog) -> Result<(), StoreError>;
}

/// Magic level for a point total: one level per hundred points.
pub fn level_for_points(points: u64) -> u64 {
    1 + points / 100
}

// ============================================================================
// Mocks
// ============================================================================

/// Mock session store for testing.
#[derive(Debug, Default)]
pub struct MockSessionStore {
    opened: Mutex<Vec<(SessionId, NewSession)>>,
    closed: Mutex<Vec<(SessionId, SessionClose)>>,
    next_id: AtomicU64,
    should_fail_open: AtomicBool,
    should_fail_close: AtomicBool,
}

impl MockSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail_open(&self, should_fail: bool) {
        self.should_fail_open.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_should_fail_close(&self, should_fail: bool) {
        self.should_fail_close.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn opened(&self) -> Vec<(SessionId, NewSession)> {
        self.opened.lock().unwrap().clone()
    }

    #[must_use]
    pub fn closed(&self) -> Vec<(SessionId, SessionClose)> {
        self.closed.lock().unwrap().clone()
    }
}

impl SessionStore for MockSessionStore {
    fn open_session(&self, session: NewSession) -> Result<SessionId, StoreError> {
        if self.should_fail_open.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated failure".to_string()));
        }
        let id = SessionId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.opened.lock().unwrap().push((id, session));
        Ok(id)
    }

    fn close_session(&self, id: SessionId, close: SessionClose) -> Result<(), StoreError> {
        if self.should_fail_close.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated failure".to_string()));
        }
        self.closed.lock().unwrap().push((id, close));
        Ok(())
    }
}

/// Mock progress ledger for testing.
#[derive(Debug, Default)]
pub struct MockProgressLedger {
    awards: Mutex<Vec<u32>>,
    breathing: Mutex<Vec<BreathingLog>>,
    should_fail: AtomicBool,
}

impl MockProgressLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn awards(&self) -> Vec<u32> {
        self.awards.lock().unwrap().clone()
    }

    #[must_use]
    pub fn breathing_logs(&self) -> Vec<BreathingLog> {
        self.breathing.lock().unwrap().clone()
    }
}

impl ProgressLedger for MockProgressLedger {
    fn add_points(&self, amount: u32) -> Result<u64, StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated failure".to_string()));
        }
        let mut awards = self.awards.lock().unwrap();
        awards.push(amount);
        Ok(awards.iter().map(|&a| u64::from(a)).sum())
    }

    fn record_breathing(&self, log: BreathingLog) -> Result<(), StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated failure".to_string()));
        }
        self.breathing.lock().unwrap().push(log);
        Ok(())
    }
}
