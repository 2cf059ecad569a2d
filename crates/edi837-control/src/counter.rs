//! Counter names, persisted state and envelope number formatting.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use edi837_model::RolloverPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};

/// Largest value any of the three counters may take (nine digits).
pub const MAX_CONTROL_NUMBER: u64 = 999_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterName {
    /// ISA13 / IEA02.
    Interchange,
    /// GS06 / GE02.
    Group,
    /// ST02 / SE02.
    Transaction,
}

impl CounterName {
    pub const ALL: [CounterName; 3] = [Self::Interchange, Self::Group, Self::Transaction];

    /// Key used in the persisted JSON.
    pub fn key(self) -> &'static str {
        match self {
            Self::Interchange => "ISA",
            Self::Group => "GS",
            Self::Transaction => "ST",
        }
    }

    pub fn max(self) -> u64 {
        MAX_CONTROL_NUMBER
    }
}

impl fmt::Display for CounterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Last-issued value per counter.
///
/// Serialized as `{"counters": {"ISA": n, "GS": n, "ST": n}, "last_updated": ts}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CounterState {
    /// Last issued value, `0` if the counter has never been used.
    pub fn get(&self, name: CounterName) -> u64 {
        self.counters.get(name.key()).copied().unwrap_or(0)
    }

    pub fn set(&mut self, name: CounterName, value: u64) {
        self.counters.insert(name.key().to_string(), value);
    }

    pub fn touch(&mut self) {
        self.last_updated = Some(Utc::now());
    }
}

/// Value following `current` under `policy`.
pub fn advance(name: CounterName, current: u64, policy: RolloverPolicy) -> Result<u64> {
    let next = current.saturating_add(1);
    if next <= name.max() {
        return Ok(next);
    }
    match policy {
        RolloverPolicy::Fail => Err(ControlError::Exhausted {
            counter: name,
            max: name.max(),
        }),
        RolloverPolicy::Wrap => {
            tracing::warn!(counter = %name, "control number wrapped to 1");
            Ok(1)
        }
    }
}

/// One document's worth of envelope numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlNumbers {
    pub interchange: u64,
    pub group: u64,
    pub transaction: u64,
}

impl ControlNumbers {
    /// Next numbers after those recorded in `state`.
    pub fn next_after(state: &CounterState, policy: RolloverPolicy) -> Result<Self> {
        Ok(Self {
            interchange: advance(
                CounterName::Interchange,
                state.get(CounterName::Interchange),
                policy,
            )?,
            group: advance(CounterName::Group, state.get(CounterName::Group), policy)?,
            transaction: advance(
                CounterName::Transaction,
                state.get(CounterName::Transaction),
                policy,
            )?,
        })
    }

    /// ISA13: nine digits, zero padded.
    pub fn isa13(&self) -> String {
        format!("{:09}", self.interchange)
    }

    /// GS06: unpadded.
    pub fn gs06(&self) -> String {
        self.group.to_string()
    }

    /// ST02: at least four digits, zero padded.
    pub fn st02(&self) -> String {
        format!("{:04}", self.transaction)
    }

    pub fn apply_to(&self, state: &mut CounterState) {
        state.set(CounterName::Interchange, self.interchange);
        state.set(CounterName::Group, self.group);
        state.set(CounterName::Transaction, self.transaction);
    }
}
