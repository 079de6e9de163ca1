use thiserror::Error;

/// Errors raised by the untyped session accessors and `save()`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session[{id}].{op}({name}) after closing")]
    Closed {
        id: String,
        op: &'static str,
        name: String,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl SessionError {
    pub(crate) fn closed(id: &str, op: &'static str, name: &str) -> Self {
        SessionError::Closed {
            id: id.to_string(),
            op,
            name: name.to_string(),
        }
    }

    /// True for the closed-session error kind
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionError::Closed { .. })
    }
}

/// Errors a persistence backend may report from `SessionStore::save`
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Implement From<StoreError> for SessionError
impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err.to_string())
    }
}

/// Implement From<serde_json::Error> for StoreError
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Implement From<std::io::Error> for StoreError
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err.to_string())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
