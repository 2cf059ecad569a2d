//! Field transformations for X12 837P assembly.
//!
//! This crate turns raw claim-record values into element-ready strings:
//!
//! - **normalization**: dates, addresses, gender, names, amounts, length clamping
//! - **fallback**: ordered "use X else Y" chains over record fields
//! - **fields**: whole-record normalization into [`NormalizedFields`]
//!
//! Everything here is pure apart from the diagnostics sink.

pub mod fallback;
pub mod fields;
pub mod normalization;

pub use fallback::{first_amount, first_text};
pub use fields::{
    CLAIM_REFERENCE_MAX, FacilityFields, NormalizedFields, PatientFields, PayerFields,
    PrescriberFields, PricingFields, ServiceFields, TransformError, grouping_key,
    normalize_record,
};
pub use normalization::{
    Clamp, DateFormat, Gender, ParsedAddress, PersonName, PostalAddress, convert_date,
    derive_gender, format_amount, format_date, format_phone, format_quantity, format_zip,
    parse_address, parse_date, split_name, truncate,
};
