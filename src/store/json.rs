//! JSON file store.
//!
//! Everything lives in `<data_dir>/store.json`. Each mutation is applied to
//! a copy of the state, written to a temp file and renamed over the old
//! file; the in-memory state is only replaced once the write succeeded.
//!
//! Besides sessions, points and breathing logs the file holds the task
//! list that pomodoro sessions can refer to.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    BreathingLog, NewSession, ProgressLedger, SessionClose, SessionId, SessionRecord,
    SessionStore, StoreError, Task, TaskId,
};

/// File name of the store inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreState {
    pub next_session_id: u64,
    pub sessions: Vec<SessionRecord>,
    pub magic_points: u64,
    pub breathing_sessions: Vec<BreathingLog>,
    pub next_task_id: u64,
    pub tasks: Vec<Task>,
}

impl StoreState {
    /// Returns the sessions started in `[from, to)`.
    pub fn sessions_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&SessionRecord> {
        self.sessions
            .iter()
            .filter(|s| s.started_at >= from && s.started_at < to)
            .collect()
    }

    /// Returns the breathing sessions finished in `[from, to)`.
    pub fn breathing_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&BreathingLog> {
        self.breathing_sessions
            .iter()
            .filter(|b| b.finished_at >= from && b.finished_at < to)
            .collect()
    }

    /// Looks up a task by id.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// File-backed implementation of [`SessionStore`] and [`ProgressLedger`].
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonStore {
    /// Opens (or creates) the store in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// store file cannot be parsed.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE_NAME);

        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StoreState::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            StoreState::default()
        };

        debug!(
            "Opened store at {} ({} sessions, {} points)",
            path.display(),
            state.sessions.len(),
            state.magic_points
        );

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` to a copy of the state and commits it to disk.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        let value = change(&mut next)?;
        self.write(&next)?;
        *guard = next;
        Ok(value)
    }

    /// Returns the task list in creation order.
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Appends a task and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is blank or the store cannot be written.
    pub fn add_task(&self, text: &str) -> Result<Task, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyTask);
        }

        let task = self.update(|state| {
            state.next_task_id += 1;
            let task = Task {
                id: TaskId(state.next_task_id),
                text: text.to_string(),
                completed: false,
                created_at: Utc::now(),
            };
            state.tasks.push(task.clone());
            Ok(task)
        })?;

        info!("Added task {}", task.id);
        Ok(task)
    }

    /// Flips the completed flag of a task and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the store cannot be written.
    pub fn toggle_task(&self, id: TaskId) -> Result<Task, StoreError> {
        self.update(|state| {
            let task = state
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(StoreError::UnknownTask(id.0))?;
            task.completed = !task.completed;
            Ok(task.clone())
        })
    }

    /// Removes a task and returns it.
    ///
    /// Session records keep their copy of the task text.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the store cannot be written.
    pub fn remove_task(&self, id: TaskId) -> Result<Task, StoreError> {
        let task = self.update(|state| {
            let index = state
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or(StoreError::UnknownTask(id.0))?;
            Ok(state.tasks.remove(index))
        })?;

        info!("Removed task {}", id);
        Ok(task)
    }

    fn write(&self, state: &StoreState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for JsonStore {
    fn open_session(&self, session: NewSession) -> Result<SessionId, StoreError> {
        let id = self.update(|state| {
            state.next_session_id += 1;
            let id = SessionId(state.next_session_id);
            state.sessions.push(SessionRecord {
                id,
                started_at: session.started_at,
                ended_at: None,
                planned_seconds: session.planned_seconds,
                task: session.task,
                task_id: session.task_id,
                was_completed: false,
                interruption_count: 0,
                focus_seconds: 0,
            });
            Ok(id)
        })?;

        info!("Opened session record {}", id);
        Ok(id)
    }

    fn close_session(&self, id: SessionId, close: SessionClose) -> Result<(), StoreError> {
        self.update(|state| {
            let record = state
                .sessions
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::UnknownSession(id.0))?;
            if !record.is_open() {
                return Err(StoreError::AlreadyClosed(id.0));
            }
            record.ended_at = Some(close.ended_at);
            record.was_completed = close.completed;
            record.interruption_count = close.interruption_count;
            record.focus_seconds = close.focus_seconds;
            Ok(())
        })?;

        info!(
            "Closed session record {} (completed: {}, interruptions: {}, focus: {}s)",
            id, close.completed, close.interruption_count, close.focus_seconds
        );
        Ok(())
    }
}

impl ProgressLedger for JsonStore {
    fn add_points(&self, amount: u32) -> Result<u64, StoreError> {
        let total = self.update(|state| {
            state.magic_points += u64::from(amount);
            Ok(state.magic_points)
        })?;

        info!("Awarded {} magic points (total: {})", amount, total);
        Ok(total)
    }

    fn record_breathing(&self, log: BreathingLog) -> Result<(), StoreError> {
        self.update(|state| {
            state.breathing_sessions.push(log);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_session(task: Option<&str>) -> NewSession {
        NewSession {
            started_at: Utc::now(),
            planned_seconds: 1500,
            task: task.map(str::to_string),
            task_id: None,
        }
    }

    fn close(completed: bool, interruptions: u32) -> SessionClose {
        SessionClose {
            ended_at: Utc::now(),
            completed,
            interruption_count: interruptions,
            focus_seconds: if completed { 1500 } else { 0 },
        }
    }

    #[test]
    fn test_open_and_close_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let id = store.open_session(new_session(Some("Relatório"))).unwrap();
        assert_eq!(id, SessionId(1));
        assert!(store.snapshot().sessions[0].is_open());

        store.close_session(id, close(true, 2)).unwrap();

        let record = &store.snapshot().sessions[0];
        assert!(!record.is_open());
        assert!(record.was_completed);
        assert_eq!(record.interruption_count, 2);
        assert_eq!(record.focus_seconds, 1500);
        assert_eq!(record.task.as_deref(), Some("Relatório"));
    }

    #[test]
    fn test_close_stores_counted_focus() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let id = store.open_session(new_session(None)).unwrap();

        let closed = SessionClose {
            ended_at: Utc::now() + Duration::minutes(20),
            completed: false,
            interruption_count: 1,
            focus_seconds: 60,
        };
        store.close_session(id, closed).unwrap();

        assert_eq!(store.snapshot().sessions[0].focus_seconds(), 60);
    }

    #[test]
    fn test_close_unknown_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let err = store.close_session(SessionId(9), close(true, 0)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownSession(9)));
    }

    #[test]
    fn test_close_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let id = store.open_session(new_session(None)).unwrap();

        store.close_session(id, close(false, 0)).unwrap();
        let err = store.close_session(id, close(true, 0)).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyClosed(1)));
        assert!(!store.snapshot().sessions[0].was_completed);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonStore::open(dir.path()).unwrap();
            let id = store.open_session(new_session(None)).unwrap();
            store.close_session(id, close(true, 0)).unwrap();
            store.add_points(10).unwrap();
            store
                .record_breathing(BreathingLog {
                    finished_at: Utc::now(),
                    pattern: "4-7-8".to_string(),
                    cycles: 4,
                })
                .unwrap();
        }

        let store = JsonStore::open(dir.path()).unwrap();
        let state = store.snapshot();
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.magic_points, 10);
        assert_eq!(state.breathing_sessions.len(), 1);

        // ids keep increasing after reopen
        assert_eq!(store.open_session(new_session(None)).unwrap(), SessionId(2));
    }

    #[test]
    fn test_add_points_returns_total() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.add_points(10).unwrap(), 10);
        assert_eq!(store.add_points(10).unwrap(), 20);
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.add_points(5).unwrap();

        // Removing the directory makes the next temp-file write fail.
        fs::remove_dir_all(dir.path()).unwrap();

        assert!(store.add_points(5).is_err());
        assert_eq!(store.snapshot().magic_points, 5);
    }

    #[test]
    fn test_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE_NAME), "{oops").unwrap();

        let err = JsonStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }

    #[test]
    fn test_sessions_between() {
        let now = Utc::now();
        let mut state = StoreState::default();
        for (id, offset) in [(1, -2), (2, 0), (3, 2)] {
            state.sessions.push(SessionRecord {
                id: SessionId(id),
                started_at: now + Duration::hours(offset),
                ended_at: None,
                planned_seconds: 60,
                task: None,
                task_id: None,
                was_completed: false,
                interruption_count: 0,
                focus_seconds: 0,
            });
        }

        let window = state.sessions_between(now - Duration::hours(1), now + Duration::hours(1));
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id, SessionId(2));
    }

    mod task_tests {
        use super::*;

        #[test]
        fn test_add_task_assigns_increasing_ids() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonStore::open(dir.path()).unwrap();

            let first = store.add_task("Revisar PR").unwrap();
            let second = store.add_task("  Escrever testes  ").unwrap();

            assert_eq!(first.id, TaskId(1));
            assert_eq!(second.id, TaskId(2));
            assert_eq!(second.text, "Escrever testes");
            assert!(!second.completed);
            assert_eq!(store.tasks().len(), 2);
        }

        #[test]
        fn test_blank_task_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonStore::open(dir.path()).unwrap();

            assert!(matches!(store.add_task("   "), Err(StoreError::EmptyTask)));
            assert!(store.tasks().is_empty());
        }

        #[test]
        fn test_toggle_task() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonStore::open(dir.path()).unwrap();
            let task = store.add_task("Ler").unwrap();

            assert!(store.toggle_task(task.id).unwrap().completed);
            assert!(!store.toggle_task(task.id).unwrap().completed);

            let err = store.toggle_task(TaskId(99)).unwrap_err();
            assert!(matches!(err, StoreError::UnknownTask(99)));
        }

        #[test]
        fn test_remove_task_keeps_ids_unique() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonStore::open(dir.path()).unwrap();
            let a = store.add_task("a").unwrap();
            store.add_task("b").unwrap();

            assert_eq!(store.remove_task(a.id).unwrap().text, "a");
            assert!(matches!(
                store.remove_task(a.id),
                Err(StoreError::UnknownTask(1))
            ));
            assert_eq!(store.add_task("c").unwrap().id, TaskId(3));
        }

        #[test]
        fn test_tasks_survive_reopen() {
            let dir = tempfile::tempdir().unwrap();
            {
                let store = JsonStore::open(dir.path()).unwrap();
                let task = store.add_task("Planejar sprint").unwrap();
                store.toggle_task(task.id).unwrap();
            }

            let state = JsonStore::open(dir.path()).unwrap().snapshot();
            let task = state.task(TaskId(1)).unwrap();
            assert_eq!(task.text, "Planejar sprint");
            assert!(task.completed);
            assert_eq!(state.next_task_id, 1);
        }

        #[test]
        fn test_session_keeps_task_reference() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonStore::open(dir.path()).unwrap();
            let task = store.add_task("Relatório").unwrap();

            let mut session = new_session(Some("Relatório"));
            session.task_id = Some(task.id);
            store.open_session(session).unwrap();

            assert_eq!(store.snapshot().sessions[0].task_id, Some(task.id));
        }
    }
}
