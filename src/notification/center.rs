//! In-memory notification list with optional file persistence.
//!
//! Newest notices come first and the list is capped at
//! [`MAX_NOTIFICATIONS`]. Every change is written back to disk when the
//! center was opened from a file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::NotificationError;
use super::{NotificationKind, Notice, Notifier};

/// Maximum number of notifications kept.
pub const MAX_NOTIFICATIONS: usize = 50;

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Short random identifier
    pub id: String,
    /// Severity
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// When the notice was raised
    pub created_at: DateTime<Utc>,
    /// Whether the user has seen it
    pub read: bool,
    /// Route to open when the notice is acted upon
    #[serde(rename = "actionUrl", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Notification {
    fn from_notice(notice: Notice) -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(9);
        Self {
            id,
            kind: notice.kind,
            title: notice.title,
            message: notice.message,
            created_at: Utc::now(),
            read: false,
            action: notice.action,
        }
    }
}

#[derive(Default)]
struct Inner {
    notifications: Vec<Notification>,
    listeners: Vec<mpsc::UnboundedSender<Notification>>,
}

/// Notification store shared by the timers and the CLI.
pub struct NotificationCenter {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
}

impl NotificationCenter {
    /// Creates a center that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            path: None,
        }
    }

    /// Opens a center backed by `path`, loading existing notices.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, NotificationError> {
        let path = path.into();
        let notifications = load(&path)?;
        debug!(
            "Loaded {} notifications from {}",
            notifications.len(),
            path.display()
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                notifications,
                listeners: Vec::new(),
            }),
            path: Some(path),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a notice and returns the stored notification.
    ///
    /// Subscribers always receive the notice and it stays in memory even
    /// when writing the file fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved.
    pub fn add(&self, notice: Notice) -> Result<Notification, NotificationError> {
        let notification = Notification::from_notice(notice);
        let mut inner = self.lock();

        inner.notifications.insert(0, notification.clone());
        inner.notifications.truncate(MAX_NOTIFICATIONS);
        inner
            .listeners
            .retain(|listener| listener.send(notification.clone()).is_ok());

        self.persist(&inner.notifications)?;
        Ok(notification)
    }

    /// Subscribes to notices added from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().listeners.push(tx);
        rx
    }

    /// Returns all notifications, newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Returns the number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.lock().notifications.iter().filter(|n| !n.read).count()
    }

    /// Marks one notification as read. Returns false if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved; nothing changes then.
    pub fn mark_read(&self, id: &str) -> Result<bool, NotificationError> {
        self.commit(|notifications| {
            match notifications.iter_mut().find(|n| n.id == id) {
                Some(notification) => {
                    notification.read = true;
                    true
                }
                None => false,
            }
        })
    }

    /// Marks every notification as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved; nothing changes then.
    pub fn mark_all_read(&self) -> Result<(), NotificationError> {
        self.commit(|notifications| {
            for notification in notifications.iter_mut() {
                notification.read = true;
            }
            true
        })?;
        Ok(())
    }

    /// Removes one notification. Returns false if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved; nothing changes then.
    pub fn remove(&self, id: &str) -> Result<bool, NotificationError> {
        self.commit(|notifications| {
            let before = notifications.len();
            notifications.retain(|n| n.id != id);
            notifications.len() != before
        })
    }

    /// Removes every notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved; nothing changes then.
    pub fn clear(&self) -> Result<(), NotificationError> {
        self.commit(|notifications| {
            notifications.clear();
            true
        })?;
        Ok(())
    }

    /// Applies `change` to a copy of the list, saves it when `change`
    /// reports a modification, then swaps it in.
    fn commit<F>(&self, change: F) -> Result<bool, NotificationError>
    where
        F: FnOnce(&mut Vec<Notification>) -> bool,
    {
        let mut inner = self.lock();
        let mut next = inner.notifications.clone();
        if !change(&mut next) {
            return Ok(false);
        }
        self.persist(&next)?;
        inner.notifications = next;
        Ok(true)
    }

    fn persist(&self, notifications: &[Notification]) -> Result<(), NotificationError> {
        match &self.path {
            Some(path) => save(path, notifications),
            None => Ok(()),
        }
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.add(notice) {
            warn!("Failed to save notification: {}", e);
        }
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("path", &self.path)
            .field("len", &self.lock().notifications.len())
            .finish_non_exhaustive()
    }
}

fn load(path: &Path) -> Result<Vec<Notification>, NotificationError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn save(path: &Path, notifications: &[Notification]) -> Result<(), NotificationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(notifications)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(title: &str) -> Notice {
        Notice::new(NotificationKind::Info, title, "body")
    }

    #[test]
    fn test_add_is_newest_first() {
        let center = NotificationCenter::in_memory();
        center.add(notice("first")).unwrap();
        center.add(notice("second")).unwrap();

        let list = center.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "second");
        assert_eq!(list[1].title, "first");
        assert!(list.iter().all(|n| !n.read));
    }

    #[test]
    fn test_id_is_nine_chars() {
        let center = NotificationCenter::in_memory();
        let stored = center.add(notice("x")).unwrap();
        assert_eq!(stored.id.len(), 9);
    }

    #[test]
    fn test_list_is_capped() {
        let center = NotificationCenter::in_memory();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            center.add(notice(&format!("n{}", i))).unwrap();
        }

        let list = center.list();
        assert_eq!(list.len(), MAX_NOTIFICATIONS);
        assert_eq!(list[0].title, format!("n{}", MAX_NOTIFICATIONS + 4));
    }

    #[test]
    fn test_mark_read_and_unread_count() {
        let center = NotificationCenter::in_memory();
        let a = center.add(notice("a")).unwrap();
        center.add(notice("b")).unwrap();
        assert_eq!(center.unread_count(), 2);

        assert!(center.mark_read(&a.id).unwrap());
        assert_eq!(center.unread_count(), 1);
        assert!(!center.mark_read("missing").unwrap());

        center.mark_all_read().unwrap();
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let center = NotificationCenter::in_memory();
        let a = center.add(notice("a")).unwrap();
        center.add(notice("b")).unwrap();

        assert!(center.remove(&a.id).unwrap());
        assert!(!center.remove(&a.id).unwrap());
        assert_eq!(center.list().len(), 1);

        center.clear().unwrap();
        assert!(center.list().is_empty());
    }

    #[test]
    fn test_notifier_impl_stores_notice() {
        let center = NotificationCenter::in_memory();
        center.notify(Notice::new(NotificationKind::Warning, "w", "m"));
        assert_eq!(center.list()[0].kind, NotificationKind::Warning);
    }

    #[test]
    fn test_subscribers_receive_new_notices() {
        let center = NotificationCenter::in_memory();
        let mut rx = center.subscribe();

        center.add(notice("hello")).unwrap();

        let received = rx.try_recv().unwrap();
        assert_eq!(received.title, "hello");
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let center = NotificationCenter::in_memory();
        drop(center.subscribe());

        center.add(notice("a")).unwrap();
        assert!(center.lock().listeners.is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");

        {
            let center = NotificationCenter::open(&path).unwrap();
            center.add(notice("kept").with_action("/dashboard")).unwrap();
        }

        let reopened = NotificationCenter::open(&path).unwrap();
        let list = reopened.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "kept");
        assert_eq!(list[0].action.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let center = NotificationCenter::open(dir.path().join("none.json")).unwrap();
        assert!(center.list().is_empty());
    }

    #[test]
    fn test_open_corrupted_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");
        fs::write(&path, "not json").unwrap();

        let err = NotificationCenter::open(&path).unwrap_err();
        assert!(err.is_corruption());
    }

    /// Opens a persisted center, then swaps its file for a directory so
    /// every later save fails.
    fn center_with_blocked_file(dir: &Path) -> NotificationCenter {
        let path = dir.join("notifications.json");
        let center = NotificationCenter::open(&path).unwrap();
        center.add(notice("a")).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        center
    }

    #[test]
    fn test_clear_reports_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let center = center_with_blocked_file(dir.path());

        let err = center.clear().unwrap_err();
        assert!(matches!(err, NotificationError::Io(_)));
        assert_eq!(center.list().len(), 1);
    }

    #[test]
    fn test_failed_mutations_leave_list_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let center = center_with_blocked_file(dir.path());
        let id = center.list()[0].id.clone();

        assert!(center.mark_read(&id).is_err());
        assert!(center.mark_all_read().is_err());
        assert!(center.remove(&id).is_err());
        assert_eq!(center.unread_count(), 1);

        // Unknown ids touch nothing, so there is nothing to save
        assert!(!center.remove("missing").unwrap());
    }

    #[test]
    fn test_notify_keeps_notice_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        let center = center_with_blocked_file(dir.path());
        let mut rx = center.subscribe();

        center.notify(notice("b"));

        assert_eq!(rx.try_recv().unwrap().title, "b");
        assert_eq!(center.list().len(), 2);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.json");
        let center = NotificationCenter::open(&path).unwrap();
        center.add(notice("a")).unwrap();
        center.clear().unwrap();

        assert_eq!(load(&path).unwrap(), Vec::new());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_serialized_shape() {
        let center = NotificationCenter::in_memory();
        let stored = center.add(notice("x")).unwrap();
        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("\"type\":\"info\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("actionUrl"));
    }
}
