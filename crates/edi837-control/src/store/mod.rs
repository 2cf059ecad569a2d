//! Counter state backends.
//!
//! A store hands out exclusive transactions over the counter state. Dropping a
//! transaction without committing releases exclusivity and leaves the
//! persisted state untouched.

mod file;
mod memory;

pub use file::{FileCounterStore, FileStoreOptions};
pub use memory::MemoryCounterStore;

use crate::counter::CounterState;
use crate::error::Result;

pub trait CounterStore: Send + Sync {
    /// Acquire exclusive access and read the current state.
    fn begin(&self) -> Result<Box<dyn CounterTransaction + '_>>;
}

pub trait CounterTransaction {
    fn state(&self) -> &CounterState;

    /// Persist `state` durably and release exclusivity.
    fn commit(self: Box<Self>, state: CounterState) -> Result<()>;
}

impl<S: CounterStore + ?Sized> CounterStore for &S {
    fn begin(&self) -> Result<Box<dyn CounterTransaction + '_>> {
        (**self).begin()
    }
}

impl<S: CounterStore + ?Sized> CounterStore for std::sync::Arc<S> {
    fn begin(&self) -> Result<Box<dyn CounterTransaction + '_>> {
        (**self).begin()
    }
}
