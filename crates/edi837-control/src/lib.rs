//! Durable control numbers for X12 interchanges.
//!
//! ISA13, GS06 and ST02 must never repeat for a trading partner. This crate
//! keeps the last-issued value of each counter in a [`CounterStore`] and
//! reserves a fresh set per document through [`ControlNumberManager`].

pub mod counter;
pub mod error;
pub mod manager;
pub mod store;

pub use counter::{ControlNumbers, CounterName, CounterState, MAX_CONTROL_NUMBER, advance};
pub use error::{ControlError, Result};
pub use manager::ControlNumberManager;
pub use store::{
    CounterStore, CounterTransaction, FileCounterStore, FileStoreOptions, MemoryCounterStore,
};
