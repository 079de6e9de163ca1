//! In-memory session registry with background reclaim

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::record::MemorySession;
use super::store::{NoopStore, SessionStore};
use super::{Session, Sessions};
use crate::SessionsConfig;

type SessionTable = Arc<Mutex<HashMap<String, Arc<MemorySession>>>>;

/// Registry mapping session IDs to live session records
///
/// Owned by the host's composition root and shared by reference (usually in
/// an `Arc`). Construction spawns the reclaim task, so it must happen inside
/// a Tokio runtime.
pub struct MemorySessions {
    by_id: SessionTable,
    release_tx: UnboundedSender<String>,
    store: Arc<dyn SessionStore>,
    config: SessionsConfig,
    reclaim_token: CancellationToken,
    reclaim_task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl MemorySessions {
    /// Create a registry whose sessions save to [`NoopStore`]
    pub fn new(config: SessionsConfig) -> Self {
        Self::with_store(config, Arc::new(NoopStore))
    }

    /// Create a registry whose sessions save to `store`
    pub fn with_store(config: SessionsConfig, store: Arc<dyn SessionStore>) -> Self {
        let by_id: SessionTable = Arc::new(Mutex::new(HashMap::new()));
        let (release_tx, release_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let handle = Self::spawn_reclaim_task(by_id.clone(), release_rx, token.clone());

        Self {
            by_id,
            release_tx,
            store,
            config,
            reclaim_token: token,
            reclaim_task: tokio::sync::Mutex::new(Some(handle)),
        }
    }

    /// Number of sessions currently in the table
    pub fn len(&self) -> usize {
        self.by_id.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.lock().is_empty()
    }

    /// Drain release notices and drop the matching table entries
    fn spawn_reclaim_task(
        by_id: SessionTable,
        mut release_rx: UnboundedReceiver<String>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    released = release_rx.recv() => {
                        let Some(id) = released else {
                            break;
                        };
                        let removed = by_id.lock().remove(&id).is_some();
                        debug!("Reclaimed session {} (entry present: {})", id, removed);
                    }
                    _ = cancel_token.cancelled() => {
                        break;
                    }
                }
            }
            log::info!("Session reclaim task stopped");
        })
    }

    /// Stop the reclaim task
    ///
    /// Sessions closed afterwards keep their table entries. Safe to call
    /// multiple times.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.reclaim_token.cancel();

        let mut task_lock = self.reclaim_task.lock().await;
        if let Some(handle) = task_lock.take() {
            let timeout = Duration::from_secs(self.config.shutdown_timeout_secs);
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(())) => {
                    log::info!("Reclaim task stopped successfully");
                }
                Ok(Err(e)) => {
                    log::warn!("Reclaim task panicked: {:?}", e);
                }
                Err(_) => {
                    log::warn!("Reclaim task didn't stop within timeout");
                }
            }
        }

        Ok(())
    }
}

impl Sessions for MemorySessions {
    fn get(&self, id: &str) -> Option<Arc<dyn Session>> {
        let mut by_id = self.by_id.lock();
        if let Some(session) = by_id.get(id) {
            return Some(session.clone() as Arc<dyn Session>);
        }
        if !id.is_empty() {
            return None;
        }

        let session = Arc::new(MemorySession::new(
            Uuid::new_v4().to_string(),
            self.release_tx.clone(),
            self.store.clone(),
            self.config.refresh_activity_on_access,
        ));
        by_id.insert(session.id().to_string(), session.clone());
        debug!("Created session {}", session.id());

        Some(session as Arc<dyn Session>)
    }
}

impl Drop for MemorySessions {
    fn drop(&mut self) {
        self.reclaim_token.cancel();
    }
}
