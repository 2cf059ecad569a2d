//! Integration tests for durable control numbers.

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use edi837_control::{
    ControlError, ControlNumberManager, CounterName, FileCounterStore, FileStoreOptions,
    MemoryCounterStore,
};
use proptest::prelude::*;

fn options() -> FileStoreOptions {
    FileStoreOptions {
        lock_timeout: Duration::from_secs(10),
        retry_interval: Duration::from_millis(1),
        backups: 0,
    }
}

#[test]
fn numbers_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("counters.json");

    let first = ControlNumberManager::new(FileCounterStore::with_options(&path, options()));
    for _ in 0..3 {
        first.with_envelope_numbers(Ok::<_, ControlError>).unwrap();
    }
    drop(first);

    let restarted = ControlNumberManager::new(FileCounterStore::with_options(&path, options()));
    let numbers = restarted
        .with_envelope_numbers(Ok::<_, ControlError>)
        .unwrap();
    assert_eq!(numbers.interchange, 4);
    assert_eq!(numbers.isa13(), "000000004");
    assert_eq!(numbers.st02(), "0004");
}

#[test]
fn crash_between_temp_write_and_rename_keeps_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counters.json");
    let store = FileCounterStore::with_options(&path, options());
    let manager = ControlNumberManager::new(store.clone());
    manager.with_envelope_numbers(Ok::<_, ControlError>).unwrap();

    // A writer died after staging its file and before renaming it.
    std::fs::write(dir.path().join("counters.json.tmp"), "{\"counters\":{\"ISA\":99}}").unwrap();

    assert_eq!(store.load().unwrap().get(CounterName::Interchange), 1);
    let numbers = manager
        .with_envelope_numbers(Ok::<_, ControlError>)
        .unwrap();
    assert_eq!(numbers.interchange, 2);
}

#[test]
fn concurrent_generators_never_share_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counters.json");
    let issued: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let path = path.clone();
                scope.spawn(move || {
                    // One store per thread, like separate processes.
                    let manager =
                        ControlNumberManager::new(FileCounterStore::with_options(path, options()));
                    (0..10)
                        .map(|_| {
                            manager
                                .with_envelope_numbers(Ok::<_, ControlError>)
                                .unwrap()
                                .interchange
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let unique: HashSet<u64> = issued.iter().copied().collect();
    assert_eq!(unique.len(), 40);
    assert_eq!(unique, (1..=40).collect());
}

#[test]
fn waiter_blocks_while_a_slow_holder_is_inside_its_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counters.json");
    let path = path.as_path();
    let (entered, wait_for_holder) = mpsc::channel();

    let (held, waited) = thread::scope(|scope| {
        let holder = scope.spawn(move || {
            let manager =
                ControlNumberManager::new(FileCounterStore::with_options(path, options()));
            manager
                .with_envelope_numbers(|numbers| {
                    entered.send(()).unwrap();
                    thread::sleep(Duration::from_millis(300));
                    Ok::<_, ControlError>(numbers)
                })
                .unwrap()
        });
        let waiter = scope.spawn(move || {
            wait_for_holder.recv().unwrap();
            thread::sleep(Duration::from_millis(50));
            let manager =
                ControlNumberManager::new(FileCounterStore::with_options(path, options()));
            let started = Instant::now();
            let numbers = manager
                .with_envelope_numbers(Ok::<_, ControlError>)
                .unwrap();
            (numbers, started.elapsed())
        });
        let held = holder.join().unwrap();
        let (numbers, elapsed) = waiter.join().unwrap();
        ((held, numbers), elapsed)
    });

    let (first, second) = held;
    assert_eq!(first.interchange, 1);
    assert_eq!(second.interchange, 2);
    assert_ne!(first.isa13(), second.isa13());
    assert!(waited >= Duration::from_millis(150), "waited {waited:?}");
}

#[test]
fn waiter_times_out_instead_of_taking_a_held_lock() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counters.json");
    // A lock file left behind by an earlier run must not matter.
    std::fs::write(dir.path().join("counters.json.lock"), "12345").unwrap();

    let holder = FileCounterStore::with_options(&path, options());
    let impatient = FileCounterStore::with_options(
        &path,
        FileStoreOptions {
            lock_timeout: Duration::from_millis(100),
            ..options()
        },
    );
    let holding = ControlNumberManager::new(holder);
    let result = holding.with_envelope_numbers(|numbers| {
        let err = ControlNumberManager::new(impatient.clone())
            .with_envelope_numbers(Ok::<_, ControlError>)
            .unwrap_err();
        assert!(matches!(err, ControlError::LockTimeout { .. }), "{err}");
        Ok::<_, ControlError>(numbers)
    });
    assert_eq!(result.unwrap().interchange, 1);
    assert_eq!(impatient.load().unwrap().get(CounterName::Interchange), 1);
}

#[test]
fn shared_manager_across_threads() {
    let manager = ControlNumberManager::new(MemoryCounterStore::new());
    let issued: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| manager.next(CounterName::Transaction).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let unique: HashSet<u64> = issued.into_iter().collect();
    assert_eq!(unique, (1..=8).collect());
}

proptest! {
    #[test]
    fn successful_documents_get_consecutive_numbers(outcomes in prop::collection::vec(any::<bool>(), 1..40)) {
        let manager = ControlNumberManager::new(MemoryCounterStore::new());
        let mut committed = Vec::new();
        for succeed in &outcomes {
            let result = manager.with_envelope_numbers(|numbers| {
                if *succeed {
                    Ok(numbers.interchange)
                } else {
                    Err(ControlError::Poisoned)
                }
            });
            if let Ok(value) = result {
                committed.push(value);
            }
        }
        let expected: Vec<u64> = (1..=committed.len() as u64).collect();
        prop_assert_eq!(committed, expected);
    }
}
