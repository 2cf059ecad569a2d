//! Engine-level errors.

use edi837_control::ControlError;
use edi837_model::{ConfigError, FormatError};
use edi837_transform::TransformError;
use thiserror::Error;

/// Anything that stops a document from being produced.
///
/// Whenever one of these is returned no control numbers have been consumed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The assembled document failed structural validation.
    #[error("document failed validation: {0}")]
    Format(#[from] FormatError),

    /// A record could not be normalized.
    #[error(transparent)]
    Record(#[from] TransformError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No record in the batch carried a grouping key.
    #[error("no claims to assemble: {records} records, {rejected} without a grouping key")]
    EmptyBatch { records: usize, rejected: usize },
}

impl EngineError {
    /// Id of the record that caused the failure, if a single record did.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::Record(err) => Some(err.record_id.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
