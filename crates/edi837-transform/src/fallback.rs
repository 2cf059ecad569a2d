//! Ordered fallback chains over record fields.
//!
//! A chain is evaluated first to last and yields the first present candidate.
//! Text is present when it is not blank; amounts when they are set and
//! non-zero, so a zero fee schedule falls through to the plan-paid amount.

use edi837_model::{AmountField, ClaimRecord, TextField};
use rust_decimal::Decimal;

pub fn first_amount(record: &ClaimRecord, chain: &[AmountField]) -> Option<Decimal> {
    chain
        .iter()
        .filter_map(|field| record.amount(*field))
        .find(|value| !value.is_zero())
}

pub fn first_text<'r>(record: &'r ClaimRecord, chain: &[TextField]) -> Option<&'r str> {
    chain
        .iter()
        .map(|field| record.text(*field).trim())
        .find(|value| !value.is_empty())
}
