//! 837 Professional document assembly.
//!
//! [`DocumentGenerator`] is the entry point. A batch of [`ClaimRecord`]s goes
//! through these steps:
//!
//! 1. **Normalization**: each record becomes element-ready values
//! 2. **Grouping**: records sharing a claim key become one claim
//! 3. **Assembly**: HL hierarchy and loop segments, in X12 order
//! 4. **Envelope**: ISA/GS/ST and trailers with reserved control numbers
//! 5. **Validation**: the rendered text is checked before numbers are committed
//!
//! [`ClaimRecord`]: edi837_model::ClaimRecord

pub mod assembler;
pub mod clock;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod hierarchy;
pub mod loops;

pub use assembler::{AssembledBody, assemble_body};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{EngineError, Result};
pub use generator::{DocumentGenerator, GeneratedDocument};
pub use grouping::{ClaimGroup, Grouping, group_claims};
pub use hierarchy::{HierarchyAllocator, hl_segment};
