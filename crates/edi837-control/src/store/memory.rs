use std::sync::{Mutex, MutexGuard};

use crate::counter::{CounterName, CounterState};
use crate::error::{ControlError, Result};
use crate::store::{CounterStore, CounterTransaction};

/// Process-local store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    state: Mutex<CounterState>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose counters start at the given last-issued values.
    pub fn seeded(interchange: u64, group: u64, transaction: u64) -> Self {
        let mut state = CounterState::default();
        state.set(CounterName::Interchange, interchange);
        state.set(CounterName::Group, group);
        state.set(CounterName::Transaction, transaction);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> Result<CounterState> {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| ControlError::Poisoned)
    }
}

struct MemoryTransaction<'a> {
    guard: MutexGuard<'a, CounterState>,
}

impl CounterTransaction for MemoryTransaction<'_> {
    fn state(&self) -> &CounterState {
        &self.guard
    }

    fn commit(mut self: Box<Self>, state: CounterState) -> Result<()> {
        *self.guard = state;
        Ok(())
    }
}

impl CounterStore for MemoryCounterStore {
    fn begin(&self) -> Result<Box<dyn CounterTransaction + '_>> {
        let guard = self.state.lock().map_err(|_| ControlError::Poisoned)?;
        Ok(Box::new(MemoryTransaction { guard }))
    }
}
