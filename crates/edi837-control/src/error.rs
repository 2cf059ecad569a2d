//! Control number error types.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::counter::CounterName;

/// Errors raised while reserving or persisting control numbers.
#[derive(Debug, Error)]
pub enum ControlError {
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but is not valid counter JSON.
    #[error("control number state {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Temp file could not be renamed over the state file.
    #[error("failed to replace {target_path} with {temp_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another writer held the lock for longer than the timeout.
    #[error("timed out after {waited:?} waiting for lock {path}")]
    LockTimeout { path: PathBuf, waited: Duration },

    /// A counter passed its maximum under the fail policy.
    #[error("{counter} control number exhausted at {max}")]
    Exhausted { counter: CounterName, max: u64 },

    /// A value outside the legal range was supplied.
    #[error("{counter} control number {value} is outside 0..={max}")]
    OutOfRange {
        counter: CounterName,
        value: u64,
        max: u64,
    },

    /// An in-memory store's mutex was poisoned by a panicking holder.
    #[error("control number store lock poisoned")]
    Poisoned,
}

impl ControlError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type for control number operations.
pub type Result<T> = std::result::Result<T, ControlError>;
