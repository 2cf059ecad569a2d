//! Shared types for X12 837 Professional claim assembly.
//!
//! - **record**: the flat claim record the engine consumes
//! - **config**: engine configuration, loadable from TOML
//! - **diagnostics**: truncation warnings and assembly issues
//! - **hierarchy**: HL tree nodes
//! - **error**: [`FormatError`], the document-fatal error

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hierarchy;
pub mod record;

pub use config::{
    AddressDefault, AddressDefaults, BillingProviderConfig, ClaimDefaults, ControlConfig,
    DatePolicy, ElementLimits, EngineConfig, FieldChains, InterchangeConfig, PricingConfig,
    ReceiverConfig, RenderConfig, RolloverPolicy, SubmitterConfig,
};
pub use diagnostics::{
    AssemblyIssue, Diagnostics, IssueSeverity, MissingIdentityError, TruncationWarning,
};
pub use error::{ConfigError, FormatError, Result};
pub use hierarchy::{HierarchyLevel, HierarchyNode};
pub use record::{AmountField, ClaimRecord, TextField};
