//! Session recorder task.
//!
//! Receives open/close requests from the timer over an unbounded channel and
//! forwards them to a [`SessionStore`]. The timer never waits for the store:
//! it names sessions with its own [`SessionHandle`]s and the recorder maps
//! those to store ids. Store calls run on the blocking thread pool so file
//! I/O never stalls the tick loop. Store failures become error notices;
//! nothing is retried.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::effect::SessionHandle;
use crate::notification::{content, Notifier};
use crate::store::{NewSession, SessionClose, SessionId, SessionStore, StoreError};

/// A request for the recorder task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderMessage {
    Open {
        handle: SessionHandle,
        session: NewSession,
    },
    Close {
        handle: SessionHandle,
        close: SessionClose,
    },
}

/// Sending side of the recorder channel.
#[derive(Debug, Clone)]
pub struct RecorderHandle {
    tx: mpsc::UnboundedSender<RecorderMessage>,
}

impl RecorderHandle {
    /// Requests a new session record.
    pub fn open(&self, handle: SessionHandle, session: NewSession) {
        self.send(RecorderMessage::Open { handle, session });
    }

    /// Requests that the record for `handle` be closed.
    pub fn close(&self, handle: SessionHandle, close: SessionClose) {
        self.send(RecorderMessage::Close { handle, close });
    }

    fn send(&self, message: RecorderMessage) {
        if self.tx.send(message).is_err() {
            warn!("Session recorder has stopped; dropping request");
        }
    }
}

/// Task that owns the store side of session recording.
pub struct SessionRecorder {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    rx: mpsc::UnboundedReceiver<RecorderMessage>,
    open: HashMap<SessionHandle, SessionId>,
}

impl SessionRecorder {
    /// Creates the recorder and the handle used to feed it.
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, RecorderHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let recorder = Self {
            store,
            notifier,
            rx,
            open: HashMap::new(),
        };
        (recorder, RecorderHandle { tx })
    }

    /// Processes requests until every [`RecorderHandle`] is dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            self.handle(message).await;
        }
        if !self.open.is_empty() {
            warn!("Recorder stopped with {} open session(s)", self.open.len());
        }
        debug!("Session recorder stopped");
    }

    async fn handle(&mut self, message: RecorderMessage) {
        match message {
            RecorderMessage::Open { handle, session } => {
                let store = Arc::clone(&self.store);
                match run_blocking(store, move |store| store.open_session(session)).await {
                    Ok(id) => {
                        debug!("Session {} recorded as {}", handle, id);
                        self.open.insert(handle, id);
                    }
                    Err(e) => {
                        warn!("Failed to open session record: {}", e);
                        self.notifier
                            .notify(content::persistence_failed("salvar sessão", &e));
                    }
                }
            }
            RecorderMessage::Close { handle, close } => {
                let Some(id) = self.open.remove(&handle) else {
                    info!("No record for session {}; skipping close", handle);
                    return;
                };
                let store = Arc::clone(&self.store);
                if let Err(e) = run_blocking(store, move |store| store.close_session(id, close)).await
                {
                    warn!("Failed to close session record {}: {}", id, e);
                    self.notifier
                        .notify(content::persistence_failed("encerrar sessão", &e));
                }
            }
        }
    }
}

/// Runs one store call on the blocking pool.
async fn run_blocking<T, F>(store: Arc<dyn SessionStore>, call: F) -> Result<T, StoreError>
where
    F: FnOnce(&dyn SessionStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|e| StoreError::Unavailable(format!("tarefa interrompida: {}", e)))?
}

impl std::fmt::Debug for SessionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecorder")
            .field("open", &self.open.len())
            .finish_non_exhaustive()
    }
}
