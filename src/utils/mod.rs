pub mod constants;
mod errors;

pub use errors::{SessionError, SessionResult, StoreError};
