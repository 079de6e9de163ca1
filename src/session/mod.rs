//! Session registry and session records
//!
//! Hosts depend on the [`Sessions`] and [`Session`] capabilities; the
//! in-memory implementation is [`MemorySessions`].
//!
//! # Locking
//!
//! The registry table and each record have independent locks and no operation
//! holds both. A closing record reports its ID over a channel and the
//! registry's reclaim task removes the table entry.

pub mod record;
pub mod registry;
pub mod store;
pub mod value;

pub use record::MemorySession;
pub use registry::MemorySessions;
pub use store::{NoopStore, SessionSnapshot, SessionStore};
pub use value::Value;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::utils::SessionResult;

/// Registry capability
pub trait Sessions: Send + Sync {
    /// Resolve a session by ID
    ///
    /// An empty `id` starts a new session. A non-empty `id` that is not
    /// registered yields `None`; no session is created for it.
    fn get(&self, id: &str) -> Option<Arc<dyn Session>>;
}

/// Session capability
///
/// Every operation is linearized per record. Once closed, `set*` and `get`
/// fail with [`SessionError::Closed`](crate::SessionError::Closed) and the
/// typed getters return `None`.
pub trait Session: Send + Sync {
    /// Immutable session identifier
    fn id(&self) -> &str;

    /// Store `value` under `name`, returning the stored value
    fn set(&self, name: &str, value: Value) -> SessionResult<Value>;
    fn set_string(&self, name: &str, value: String) -> SessionResult<String>;
    fn set_int(&self, name: &str, value: i64) -> SessionResult<i64>;
    fn set_bool(&self, name: &str, value: bool) -> SessionResult<bool>;

    /// Stored value for `name`, `Ok(None)` if never set
    fn get(&self, name: &str) -> SessionResult<Option<Value>>;

    /// Textual form of the stored value
    fn get_string(&self, name: &str) -> Option<String>;
    /// Stored integer, or the stored value's text parsed as base-10
    fn get_int(&self, name: &str) -> Option<i64>;
    /// Stored boolean, or one of `true|yes|1` / `false|no|0` (case-insensitive)
    fn get_bool(&self, name: &str) -> Option<bool>;

    /// Snapshot copy of all attributes
    fn data(&self) -> HashMap<String, Value>;

    /// Hand a snapshot to the configured store
    fn save(&self) -> SessionResult<()>;

    /// Close the session and ask the registry to reclaim it. Idempotent.
    fn close(&self);

    fn is_closed(&self) -> bool;
    fn started_at(&self) -> DateTime<Utc>;
    fn last_activity_at(&self) -> DateTime<Utc>;
}
