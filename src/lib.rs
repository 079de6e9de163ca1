//! In-process session registry for HTTP hosts
//!
//! Tracks short-lived per-client key/value records identified by a unique
//! token. Call `Sessions::get("")` to start a session, `Sessions::get(id)` to
//! resume it, and the typed accessors on the returned [`Session`].

pub mod session;
mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_SHUTDOWN_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Refresh `last_activity_at` on every successful access
    #[serde(default)]
    pub refresh_activity_on_access: bool,

    /// How long `shutdown()` waits for the reclaim task
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_shutdown_timeout_secs() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            refresh_activity_on_access: false,
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl SessionsConfig {
    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// Load config from config.yaml in package root
pub fn load_yaml_config() -> anyhow::Result<SessionsConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yaml");

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        SessionsConfig::from_yaml_str(&contents)
    } else {
        Ok(SessionsConfig::default())
    }
}

pub use session::{
    MemorySession, MemorySessions, NoopStore, Session, SessionSnapshot, SessionStore, Sessions,
    Value,
};
pub use utils::constants;
pub use utils::{SessionError, SessionResult, StoreError};
