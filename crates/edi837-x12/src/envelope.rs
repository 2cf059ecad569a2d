//! Interchange, functional group and transaction set envelopes.
//!
//! # Structure
//!
//! ```text
//! ISA  interchange header (fixed width, 106 characters with terminator)
//!  GS  functional group header
//!   ST  transaction set header
//!   ..  transaction body
//!   SE  transaction set trailer (segment count, ST02)
//!  GE  functional group trailer (transaction count, GS06)
//! IEA  interchange trailer (group count, ISA13)
//! ```

use chrono::NaiveDateTime;
use edi837_control::ControlNumbers;
use edi837_model::InterchangeConfig;

use crate::segment::{COMPONENT_SEPARATOR, REPETITION_SEPARATOR, Segment};

/// Rendered ISA length including the segment terminator.
pub const ISA_LEN: usize = 106;

/// ISA12 interchange control version.
pub const ISA_VERSION: &str = "00501";

/// ST01 / GS01 for the 837.
pub const TRANSACTION_SET_ID: &str = "837";
pub const FUNCTIONAL_ID: &str = "HC";

/// Left-justify and space-pad `value` to exactly `len` characters.
fn fixed(value: &str, len: usize) -> String {
    let cut: String = value.chars().take(len).collect();
    format!("{cut:<len$}")
}

/// ISA with every element at its fixed width.
///
/// | Element | Width | Value |
/// |---------|-------|-------|
/// | ISA01/02 | 2/10 | no authorization |
/// | ISA03/04 | 2/10 | no security |
/// | ISA05/06 | 2/15 | sender qualifier and id |
/// | ISA07/08 | 2/15 | receiver qualifier and id |
/// | ISA09/10 | 6/4 | `YYMMDD` / `HHMM` |
/// | ISA11 | 1 | repetition separator |
/// | ISA12 | 5 | `00501` |
/// | ISA13 | 9 | interchange control number |
/// | ISA14 | 1 | acknowledgment requested |
/// | ISA15 | 1 | usage indicator |
/// | ISA16 | 1 | component separator |
pub fn build_isa(config: &InterchangeConfig, isa13: &str, timestamp: NaiveDateTime) -> Segment {
    Segment::new("ISA")
        .raw("00")
        .raw(fixed("", 10))
        .raw("00")
        .raw(fixed("", 10))
        .raw(fixed(&config.sender_qualifier, 2))
        .raw(fixed(&config.sender_id, 15))
        .raw(fixed(&config.receiver_qualifier, 2))
        .raw(fixed(&config.receiver_id, 15))
        .raw(timestamp.format("%y%m%d").to_string())
        .raw(timestamp.format("%H%M").to_string())
        .raw(REPETITION_SEPARATOR.to_string())
        .raw(ISA_VERSION)
        .raw(fixed(isa13, 9))
        .raw(if config.acknowledgment_requested { "1" } else { "0" })
        .raw(fixed(&config.usage_indicator, 1))
        .raw(COMPONENT_SEPARATOR.to_string())
}

pub fn build_gs(config: &InterchangeConfig, gs06: &str, timestamp: NaiveDateTime) -> Segment {
    Segment::new("GS")
        .text(FUNCTIONAL_ID)
        .text(&config.sender_id)
        .text(&config.receiver_id)
        .text(timestamp.format("%Y%m%d").to_string())
        .text(timestamp.format("%H%M").to_string())
        .text(gs06)
        .text("X")
        .text(&config.version)
}

pub fn build_st(st02: &str, version: &str) -> Segment {
    Segment::new("ST")
        .text(TRANSACTION_SET_ID)
        .text(st02)
        .text(version)
}

/// SE01 counts every segment from ST through SE inclusive.
pub fn build_se(segment_count: usize, st02: &str) -> Segment {
    Segment::new("SE").text(segment_count.to_string()).text(st02)
}

pub fn build_ge(transaction_count: usize, gs06: &str) -> Segment {
    Segment::new("GE")
        .text(transaction_count.to_string())
        .text(gs06)
}

pub fn build_iea(group_count: usize, isa13: &str) -> Segment {
    Segment::new("IEA")
        .text(group_count.to_string())
        .text(isa13)
}

/// Wrap a transaction body (everything between ST and SE) in a complete
/// single-group, single-transaction interchange.
pub fn wrap_transaction(
    body: Vec<Segment>,
    config: &InterchangeConfig,
    numbers: &ControlNumbers,
    timestamp: NaiveDateTime,
) -> Vec<Segment> {
    let isa13 = numbers.isa13();
    let gs06 = numbers.gs06();
    let st02 = numbers.st02();
    // ST and SE themselves are counted.
    let se01 = body.len() + 2;

    let mut segments = Vec::with_capacity(body.len() + 6);
    segments.push(build_isa(config, &isa13, timestamp));
    segments.push(build_gs(config, &gs06, timestamp));
    segments.push(build_st(&st02, &config.version));
    segments.extend(body);
    segments.push(build_se(se01, &st02));
    segments.push(build_ge(1, &gs06));
    segments.push(build_iea(1, &isa13));
    segments
}
