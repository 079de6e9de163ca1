//! Shared constants for the session registry
//!
//! Default values and literal tables used throughout the crate.

/// Default time to wait for the reclaim task during `shutdown()`
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Case-insensitive textual forms accepted as `true` by `get_bool`
pub const TRUE_LITERALS: &[&str] = &["true", "yes", "1"];

/// Case-insensitive textual forms accepted as `false` by `get_bool`
pub const FALSE_LITERALS: &[&str] = &["false", "no", "0"];
