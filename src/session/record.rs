//! In-memory session record

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::store::{SessionSnapshot, SessionStore};
use super::value::Value;
use super::Session;
use crate::utils::{SessionError, SessionResult};

/// Mutable part of a session, guarded by the record lock
struct SessionState {
    closed: bool,
    last_activity_at: DateTime<Utc>,
    attributes: HashMap<String, Value>,
}

/// Session record owned by [`MemorySessions`](super::MemorySessions)
pub struct MemorySession {
    id: String,
    started_at: DateTime<Utc>,
    state: Mutex<SessionState>,

    /// Release notices for the registry's reclaim task
    release_tx: UnboundedSender<String>,

    store: Arc<dyn SessionStore>,

    /// Refresh `last_activity_at` on every successful access
    refresh_activity: bool,
}

impl MemorySession {
    pub(crate) fn new(
        id: String,
        release_tx: UnboundedSender<String>,
        store: Arc<dyn SessionStore>,
        refresh_activity: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            started_at: now,
            state: Mutex::new(SessionState {
                closed: false,
                last_activity_at: now,
                attributes: HashMap::new(),
            }),
            release_tx,
            store,
            refresh_activity,
        }
    }

    fn touch(&self, state: &mut SessionState) {
        if self.refresh_activity {
            state.last_activity_at = Utc::now();
        }
    }

    fn store_value(&self, op: &'static str, name: &str, value: Value) -> SessionResult<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SessionError::closed(&self.id, op, name));
        }
        state.attributes.insert(name.to_string(), value);
        self.touch(&mut state);
        Ok(())
    }

    /// Apply a typed view to the stored value; `None` when closed or absent
    fn read_as<T>(&self, name: &str, view: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        let found = state.attributes.get(name).and_then(view);
        if found.is_some() {
            self.touch(&mut state);
        }
        found
    }
}

impl Session for MemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn set(&self, name: &str, value: Value) -> SessionResult<Value> {
        self.store_value("set", name, value.clone())?;
        Ok(value)
    }

    fn set_string(&self, name: &str, value: String) -> SessionResult<String> {
        self.store_value("set_string", name, Value::String(value.clone()))?;
        Ok(value)
    }

    fn set_int(&self, name: &str, value: i64) -> SessionResult<i64> {
        self.store_value("set_int", name, Value::Int(value))?;
        Ok(value)
    }

    fn set_bool(&self, name: &str, value: bool) -> SessionResult<bool> {
        self.store_value("set_bool", name, Value::Bool(value))?;
        Ok(value)
    }

    fn get(&self, name: &str) -> SessionResult<Option<Value>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SessionError::closed(&self.id, "get", name));
        }
        let value = state.attributes.get(name).cloned();
        self.touch(&mut state);
        Ok(value)
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.read_as(name, |v| Some(v.to_text()))
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        self.read_as(name, Value::coerce_int)
    }

    fn get_bool(&self, name: &str) -> Option<bool> {
        self.read_as(name, Value::coerce_bool)
    }

    fn data(&self) -> HashMap<String, Value> {
        self.state.lock().attributes.clone()
    }

    fn save(&self) -> SessionResult<()> {
        let snapshot = {
            let state = self.state.lock();
            SessionSnapshot {
                id: self.id.clone(),
                started_at: self.started_at,
                last_activity_at: state.last_activity_at,
                closed: state.closed,
                attributes: state.attributes.clone(),
            }
        };
        self.store.save(&snapshot)?;
        Ok(())
    }

    fn close(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
        }

        if self.release_tx.send(self.id.clone()).is_err() {
            debug!("Session {} closed after registry shutdown, not reclaimed", self.id);
        } else {
            debug!("Session {} closed, release queued", self.id);
        }
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn last_activity_at(&self) -> DateTime<Utc> {
        self.state.lock().last_activity_at
    }
}
