//! X12 005010 segment handling for the 837 Professional.
//!
//! - **segment**: segment model, delimiters and data sanitizing
//! - **envelope**: ISA/GS/ST and trailer builders
//! - **k3**: fixed-width NCPDP record for line-level K3
//! - **writer**: rendering to interchange text
//! - **validate**: structural checks on rendered text

pub mod envelope;
pub mod k3;
pub mod segment;
pub mod validate;
pub mod writer;

pub use envelope::{
    ISA_LEN, build_ge, build_gs, build_iea, build_isa, build_se, build_st, wrap_transaction,
};
pub use k3::{K3Encoding, K3Fields, K3Overflow, NCPDP_RECORD_LEN, encode_k3, encode_k3_checked};
pub use segment::{
    COMPONENT_SEPARATOR, ELEMENT_SEPARATOR, REPETITION_SEPARATOR, SEGMENT_TERMINATOR, Segment,
    sanitize,
};
pub use validate::{ExpectedCounts, RawSegment, split_segments, validate, validate_all};
pub use writer::{EdiDocument, RenderOptions};
