//! Issue-before-use control number reservation.

use edi837_model::RolloverPolicy;

use crate::counter::{ControlNumbers, CounterName, advance};
use crate::error::{ControlError, Result};
use crate::store::CounterStore;

/// Hands out ISA/GS/ST control numbers from an injected store.
///
/// Numbers only move forward. A number is persisted before the caller gets a
/// document that uses it, and a failed document leaves the counters unchanged.
#[derive(Debug)]
pub struct ControlNumberManager<S> {
    store: S,
    rollover: RolloverPolicy,
}

impl<S: CounterStore> ControlNumberManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rollover: RolloverPolicy::default(),
        }
    }

    pub fn with_rollover(mut self, rollover: RolloverPolicy) -> Self {
        self.rollover = rollover;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reserve and persist the next value of a single counter.
    pub fn next(&self, name: CounterName) -> Result<u64> {
        let tx = self.store.begin()?;
        let mut state = tx.state().clone();
        let value = advance(name, state.get(name), self.rollover)?;
        state.set(name, value);
        state.touch();
        tx.commit(state)?;
        tracing::debug!(counter = %name, value, "issued control number");
        Ok(value)
    }

    /// Last issued value of a counter.
    pub fn current(&self, name: CounterName) -> Result<u64> {
        let tx = self.store.begin()?;
        Ok(tx.state().get(name))
    }

    /// Overwrite a counter, for recovery after restoring a backup.
    ///
    /// Setting a value lower than one already used in transmitted documents
    /// leads to duplicate control numbers at the receiver.
    pub fn set(&self, name: CounterName, value: u64) -> Result<()> {
        if value > name.max() {
            return Err(ControlError::OutOfRange {
                counter: name,
                value,
                max: name.max(),
            });
        }
        let tx = self.store.begin()?;
        let mut state = tx.state().clone();
        state.set(name, value);
        state.touch();
        tx.commit(state)?;
        tracing::warn!(counter = %name, value, "control number overwritten");
        Ok(())
    }

    /// Reserve one interchange, group and transaction number and run `build`
    /// with them while holding exclusive access.
    ///
    /// The new values are persisted only if `build` succeeds, and before its
    /// output is returned. On failure the counters are untouched and the
    /// lock is released.
    pub fn with_envelope_numbers<T, E, F>(&self, build: F) -> std::result::Result<T, E>
    where
        F: FnOnce(ControlNumbers) -> std::result::Result<T, E>,
        E: From<ControlError>,
    {
        let tx = self.store.begin()?;
        let mut state = tx.state().clone();
        let numbers = ControlNumbers::next_after(&state, self.rollover)?;

        let output = build(numbers)?;

        numbers.apply_to(&mut state);
        state.touch();
        tx.commit(state)?;
        tracing::info!(
            interchange = numbers.interchange,
            group = numbers.group,
            transaction = numbers.transaction,
            "reserved envelope control numbers"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MAX_CONTROL_NUMBER;
    use crate::store::MemoryCounterStore;

    #[test]
    fn next_is_strictly_increasing() {
        let manager = ControlNumberManager::new(MemoryCounterStore::new());
        let values: Vec<u64> = (0..5)
            .map(|_| manager.next(CounterName::Interchange).unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(manager.current(CounterName::Group).unwrap(), 0);
    }

    #[test]
    fn failed_build_leaves_state_untouched() {
        let manager = ControlNumberManager::new(MemoryCounterStore::seeded(10, 20, 30));
        let result: std::result::Result<(), ControlError> =
            manager.with_envelope_numbers(|_| Err(ControlError::Poisoned));
        assert!(result.is_err());
        let state = manager.store().snapshot().unwrap();
        assert_eq!(state.get(CounterName::Interchange), 10);
        assert_eq!(state.get(CounterName::Transaction), 30);
    }

    #[test]
    fn envelope_numbers_advance_together() {
        let manager = ControlNumberManager::new(MemoryCounterStore::seeded(10, 20, 30));
        let numbers = manager
            .with_envelope_numbers(Ok::<_, ControlError>)
            .unwrap();
        assert_eq!(
            numbers,
            ControlNumbers {
                interchange: 11,
                group: 21,
                transaction: 31,
            }
        );
        assert_eq!(manager.current(CounterName::Group).unwrap(), 21);
    }

    #[test]
    fn exhausted_counter_fails_without_consuming() {
        let manager =
            ControlNumberManager::new(MemoryCounterStore::seeded(MAX_CONTROL_NUMBER, 1, 1));
        let err = manager
            .with_envelope_numbers(Ok::<_, ControlError>)
            .unwrap_err();
        assert!(matches!(
            err,
            ControlError::Exhausted {
                counter: CounterName::Interchange,
                ..
            }
        ));
        assert_eq!(
            manager.current(CounterName::Group).unwrap(),
            1,
            "no counter may move when one is exhausted"
        );
    }

    #[test]
    fn wrap_policy_restarts_at_one() {
        let manager =
            ControlNumberManager::new(MemoryCounterStore::seeded(MAX_CONTROL_NUMBER, 5, 5))
                .with_rollover(RolloverPolicy::Wrap);
        let numbers = manager
            .with_envelope_numbers(Ok::<_, ControlError>)
            .unwrap();
        assert_eq!(numbers.interchange, 1);
        assert_eq!(numbers.group, 6);
    }

    #[test]
    fn set_rejects_out_of_range() {
        let manager = ControlNumberManager::new(MemoryCounterStore::new());
        assert!(manager.set(CounterName::Transaction, MAX_CONTROL_NUMBER + 1).is_err());
        manager.set(CounterName::Transaction, 500).unwrap();
        assert_eq!(manager.next(CounterName::Transaction).unwrap(), 501);
    }
}
