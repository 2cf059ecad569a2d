//! Error types shared by the transformation library and the document validator.

use std::path::PathBuf;
use thiserror::Error;

/// A document-level formatting failure.
///
/// Any of these aborts generation of the current document. Positions are
/// zero-based segment indexes within the rendered interchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A date value could not be parsed.
    #[error("unparsable date value '{value}'")]
    InvalidDate { value: String },

    /// A fixed-width segment has the wrong rendered length.
    #[error("{segment} segment at position {position} must be {expected} characters, found {actual}")]
    SegmentLength {
        segment: String,
        position: usize,
        expected: usize,
        actual: usize,
    },

    /// A segment carries too few or too many elements.
    #[error(
        "{segment} segment at position {position} has {actual} elements, expected {min}..={max}"
    )]
    ElementCount {
        segment: String,
        position: usize,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// The number of segments with a given identifier is wrong.
    #[error("expected {expected} {segment} segments, found {actual}")]
    SegmentCount {
        segment: String,
        expected: usize,
        actual: usize,
    },

    /// A loop is missing a mandatory segment.
    #[error("loop {loop_id} starting at position {position} is missing {segment}")]
    MissingSegment {
        loop_id: String,
        segment: String,
        position: usize,
    },

    /// An element does not hold the value it must.
    #[error("{segment}{element:02} at position {position}: expected '{expected}', found '{actual}'")]
    ElementValue {
        segment: String,
        position: usize,
        element: usize,
        expected: String,
        actual: String,
    },

    /// A segment appears where the envelope structure does not allow it.
    #[error("{segment} segment at position {position} is out of order, expected {expected}")]
    SegmentOrder {
        segment: String,
        position: usize,
        expected: String,
    },

    /// A segment identifier that has no place in an 837P interchange.
    #[error("unknown segment '{segment}' at position {position}")]
    UnknownSegment { segment: String, position: usize },

    /// The HL tree is malformed.
    #[error("hierarchy error at position {position}: {message}")]
    Hierarchy { position: usize, message: String },
}

impl FormatError {
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Segment identifier the error refers to, if any.
    pub fn segment(&self) -> Option<&str> {
        match self {
            Self::SegmentLength { segment, .. }
            | Self::ElementCount { segment, .. }
            | Self::SegmentCount { segment, .. }
            | Self::MissingSegment { segment, .. }
            | Self::ElementValue { segment, .. }
            | Self::SegmentOrder { segment, .. }
            | Self::UnknownSegment { segment, .. } => Some(segment),
            Self::InvalidDate { .. } | Self::Hierarchy { .. } => None,
        }
    }

    /// Segment index within the interchange, if the error is positional.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::SegmentLength { position, .. }
            | Self::ElementCount { position, .. }
            | Self::MissingSegment { position, .. }
            | Self::ElementValue { position, .. }
            | Self::SegmentOrder { position, .. }
            | Self::UnknownSegment { position, .. }
            | Self::Hierarchy { position, .. } => Some(*position),
            Self::InvalidDate { .. } | Self::SegmentCount { .. } => None,
        }
    }
}

/// Errors raised while loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for formatting operations.
pub type Result<T> = std::result::Result<T, FormatError>;
