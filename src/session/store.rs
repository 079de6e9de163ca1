//! Persistence hook for session records
//!
//! The registry keeps everything in memory. A host that wants durable sessions
//! injects a [`SessionStore`]; `Session::save()` hands it a snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::value::Value;
use crate::utils::StoreError;

/// Point-in-time copy of a session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier
    pub id: String,
    /// When the session was created
    pub started_at: DateTime<Utc>,
    /// Last recorded activity
    pub last_activity_at: DateTime<Utc>,
    /// Whether the session was closed at snapshot time
    pub closed: bool,
    /// Attribute map
    pub attributes: HashMap<String, Value>,
}

/// Durable storage collaborator
///
/// Called without any session or registry lock held.
pub trait SessionStore: Send + Sync {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError>;
}

/// Store that accepts every snapshot and keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl SessionStore for NoopStore {
    fn save(&self, _snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        Ok(())
    }
}
