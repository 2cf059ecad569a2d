//! NCPDP pharmacy data carried in a line-level K3 segment.
//!
//! The K3 element holds a fixed-width 80 character record. Positions below are
//! 1-based as published; offsets in code are 0-based.
//!
//! | Pos | Len | Content |
//! |-----|-----|---------|
//! | 1-2 | 2 | fill number, always `00` |
//! | 4 | 1 | dispense-as-written code, default `0` |
//! | 42-43 | 2 | basis of cost, always `01` |
//! | 62-69 | 8 | date written, `MMDDCCYY` or blank |
//! | 71-73 | 3 | days supply, zero padded, `000` if unknown |
//! | 74 | 1 | `G` generic or `B` brand |
//!
//! Every other position is a space.

use chrono::NaiveDate;

use crate::segment::Segment;

/// Length of the NCPDP record.
pub const NCPDP_RECORD_LEN: usize = 80;

const FILL_NUMBER: &str = "00";
const BASIS_OF_COST: &str = "01";

/// Source values for one NCPDP record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct K3Fields {
    pub daw: Option<u8>,
    pub written_date: Option<NaiveDate>,
    pub days_supply: Option<u32>,
    pub brand: bool,
}

/// A field whose value did not fit its window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct K3Overflow {
    pub field: &'static str,
    pub value: String,
    pub width: usize,
}

/// An encoded record plus any fields that had to be cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct K3Encoding {
    pub record: String,
    pub overflows: Vec<K3Overflow>,
}

impl K3Encoding {
    pub fn segment(&self) -> Segment {
        Segment::new("K3").raw(self.record.clone())
    }
}

/// Write `value` at `offset`, cutting it to `len` bytes.
///
/// Returns `true` when the value was cut.
fn write_field(
    record: &mut [u8; NCPDP_RECORD_LEN],
    offset: usize,
    value: &str,
    len: usize,
) -> bool {
    let bytes = value.as_bytes();
    let copy_len = bytes.len().min(len);
    record[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
    bytes.len() > len
}

/// Encode the record, reporting overflowing fields.
pub fn encode_k3_checked(fields: &K3Fields) -> K3Encoding {
    let mut record = [b' '; NCPDP_RECORD_LEN];
    let mut overflows = Vec::new();
    let mut put = |offset: usize, field: &'static str, value: String, width: usize| {
        if write_field(&mut record, offset, &value, width) {
            overflows.push(K3Overflow {
                field,
                value,
                width,
            });
        }
    };

    put(0, "fill number", FILL_NUMBER.to_string(), 2);
    put(3, "daw", fields.daw.unwrap_or(0).to_string(), 1);
    put(41, "basis of cost", BASIS_OF_COST.to_string(), 2);
    if let Some(date) = fields.written_date {
        put(61, "date written", date.format("%m%d%Y").to_string(), 8);
    }
    put(
        70,
        "days supply",
        format!("{:03}", fields.days_supply.unwrap_or(0)),
        3,
    );
    put(
        73,
        "generic flag",
        if fields.brand { "B" } else { "G" }.to_string(),
        1,
    );

    let record = record.iter().map(|&b| char::from(b)).collect();
    K3Encoding { record, overflows }
}

/// Encode the record. Always exactly [`NCPDP_RECORD_LEN`] characters.
pub fn encode_k3(fields: &K3Fields) -> String {
    encode_k3_checked(fields).record
}
