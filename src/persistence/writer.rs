//! Background persistence writer
//!
//! Request paths call [`PersistenceWriter::schedule_save`], which only pushes
//! a trigger onto a channel. A single task drains the channel, folds every
//! queued trigger into one write and takes the snapshot at write time, so
//! each write covers the state at or after the triggers it absorbed and
//! writes land in order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::backends::PersistenceBackend;
use crate::errors::{LinkmapError, Result};
use crate::storage::LinkStore;

enum Job {
    Save,
    Flush(oneshot::Sender<Result<()>>),
    Shutdown(oneshot::Sender<Result<()>>),
}

#[derive(Debug, Default)]
struct Counters {
    saves_completed: AtomicU64,
    saves_failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistenceStats {
    pub saves_completed: u64,
    pub saves_failed: u64,
}

pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<Job>,
    task: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
    backend_name: &'static str,
}

impl PersistenceWriter {
    /// Start the writer task. Must be called from within a Tokio runtime.
    pub fn spawn(store: Arc<LinkStore>, backend: Arc<dyn PersistenceBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        let backend_name = backend.backend_name();

        let worker = Worker {
            store,
            backend,
            counters: Arc::clone(&counters),
            dirty: false,
            last_error: None,
        };
        let task = tokio::spawn(worker.run(rx));
        debug!("PersistenceWriter: started ({} backend)", backend_name);

        Self {
            tx,
            task: Mutex::new(Some(task)),
            counters,
            backend_name,
        }
    }

    /// Request a write of the current store state. Never blocks.
    pub fn schedule_save(&self) {
        if self.tx.send(Job::Save).is_err() {
            warn!("PersistenceWriter: save requested after shutdown, ignoring");
        }
    }

    /// Wait until every save scheduled before this call has been attempted.
    ///
    /// Returns the error of the last write if the store is still not
    /// durably saved.
    pub async fn flush(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Job::Flush(reply))
            .map_err(|_| LinkmapError::persistence_closed("writer has shut down"))?;
        rx.await
            .map_err(|_| LinkmapError::persistence_closed("writer stopped before flushing"))?
    }

    /// Final flush, then stop the writer task. Calling it again is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Job::Shutdown(reply)).is_err() {
            debug!("PersistenceWriter: already shut down");
            return Ok(());
        }

        // A concurrent shutdown reached the worker first and owns the result.
        let Ok(result) = rx.await else {
            debug!("PersistenceWriter: shutdown already handled by another caller");
            return Ok(());
        };

        let task = self.task.lock().take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            error!("PersistenceWriter: task ended abnormally: {}", e);
        }
        info!("PersistenceWriter: stopped");
        result
    }

    pub fn stats(&self) -> PersistenceStats {
        PersistenceStats {
            saves_completed: self.counters.saves_completed.load(Ordering::Relaxed),
            saves_failed: self.counters.saves_failed.load(Ordering::Relaxed),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }
}

struct Worker {
    store: Arc<LinkStore>,
    backend: Arc<dyn PersistenceBackend>,
    counters: Arc<Counters>,
    /// Store changed since the last successful write
    dirty: bool,
    last_error: Option<LinkmapError>,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Job>) {
        while let Some(first) = rx.recv().await {
            let mut job = first;
            let control = loop {
                match job {
                    Job::Save => self.dirty = true,
                    other => break Some(other),
                }
                match rx.try_recv() {
                    Ok(next) => job = next,
                    Err(_) => break None,
                }
            };

            if self.dirty {
                self.write().await;
            }

            match control {
                Some(Job::Flush(reply)) => {
                    let _ = reply.send(self.outcome());
                }
                Some(Job::Shutdown(reply)) => {
                    let _ = reply.send(self.outcome());
                    return;
                }
                Some(Job::Save) | None => {}
            }
        }

        // All handles dropped without an explicit shutdown.
        if self.dirty {
            self.write().await;
        }
    }

    async fn write(&mut self) {
        let snapshot = self.store.snapshot();
        match self.backend.save(&snapshot).await {
            Ok(()) => {
                self.dirty = false;
                self.last_error = None;
                self.counters.saves_completed.fetch_add(1, Ordering::Relaxed);
                debug!("PersistenceWriter: persisted {} entries", snapshot.len());
            }
            Err(e) => {
                self.counters.saves_failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    "PersistenceWriter: failed to persist {} entries: {}",
                    snapshot.len(),
                    e
                );
                self.last_error = Some(e);
            }
        }
    }

    fn outcome(&self) -> Result<()> {
        match (&self.last_error, self.dirty) {
            (Some(e), true) => Err(e.clone()),
            _ => Ok(()),
        }
    }
}
