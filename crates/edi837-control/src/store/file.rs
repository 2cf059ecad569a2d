//! JSON state file guarded by an advisory lock.
//!
//! Layout next to the state file `counters.json`:
//!
//! | File | Purpose |
//! |------|---------|
//! | `counters.json.lock` | target of the exclusive advisory lock, never removed |
//! | `counters.json.tmp` | staging file for the atomic replace |
//! | `counters.json.bak.N` | rotated copies of previous states, newest is `1` |

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use edi837_model::ControlConfig;

use crate::counter::CounterState;
use crate::error::{ControlError, Result};
use crate::store::{CounterStore, CounterTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStoreOptions {
    pub lock_timeout: Duration,
    pub retry_interval: Duration,
    pub backups: usize,
}

impl Default for FileStoreOptions {
    fn default() -> Self {
        Self::from(&ControlConfig::default())
    }
}

impl From<&ControlConfig> for FileStoreOptions {
    fn from(config: &ControlConfig) -> Self {
        Self {
            lock_timeout: Duration::from_millis(config.lock_timeout_ms),
            retry_interval: Duration::from_millis(10),
            backups: config.backups,
        }
    }
}

/// Counter state persisted as JSON on the local filesystem.
///
/// Safe to share between threads and between processes pointing at the same
/// path.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
    options: FileStoreOptions,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, FileStoreOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: FileStoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn from_config(config: &ControlConfig) -> Self {
        Self::with_options(config.state_path.clone(), FileStoreOptions::from(config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        sibling(&self.path, ".lock")
    }

    fn temp_path(&self) -> PathBuf {
        sibling(&self.path, ".tmp")
    }

    pub fn backup_path(&self, index: usize) -> PathBuf {
        sibling(&self.path, &format!(".bak.{index}"))
    }

    /// Read the current state without taking the lock.
    pub fn load(&self) -> Result<CounterState> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CounterState::default()),
            Err(e) => return Err(ControlError::io("read", &self.path, e)),
        };
        serde_json::from_str(&text).map_err(|source| ControlError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn acquire(&self) -> Result<LockGuard> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ControlError::io("create directory", parent, e))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| ControlError::io("open", &lock_path, e))?;

        let started = Instant::now();
        loop {
            match file.try_lock() {
                Ok(()) => {
                    tracing::trace!(path = %lock_path.display(), "acquired control number lock");
                    return Ok(LockGuard {
                        file,
                        path: lock_path,
                    });
                }
                Err(TryLockError::WouldBlock) => {
                    let waited = started.elapsed();
                    if waited >= self.options.lock_timeout {
                        return Err(ControlError::LockTimeout {
                            path: lock_path,
                            waited,
                        });
                    }
                    thread::sleep(self.options.retry_interval);
                }
                Err(TryLockError::Error(e)) => {
                    return Err(ControlError::io("lock", &lock_path, e));
                }
            }
        }
    }

    fn rotate_backups(&self) -> Result<()> {
        if self.options.backups == 0 || !self.path.exists() {
            return Ok(());
        }
        for index in (1..self.options.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                let to = self.backup_path(index + 1);
                fs::rename(&from, &to).map_err(|e| ControlError::io("rotate", &from, e))?;
            }
        }
        let first = self.backup_path(1);
        fs::copy(&self.path, &first).map_err(|e| ControlError::io("back up", &first, e))?;
        Ok(())
    }

    fn write_atomic(&self, state: &CounterState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state).map_err(|source| ControlError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        self.rotate_backups()?;

        let temp_path = self.temp_path();
        let mut file =
            File::create(&temp_path).map_err(|e| ControlError::io("create", &temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| ControlError::io("write", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| ControlError::io("sync", &temp_path, e))?;

        fs::rename(&temp_path, &self.path).map_err(|source| ControlError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "saved control number state");
        Ok(())
    }
}

/// Exclusive advisory lock on the `.lock` file.
///
/// The lock file itself is left in place. The kernel drops the lock if the
/// process dies while holding it.
#[derive(Debug)]
struct LockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to release control number lock"
            );
        }
    }
}

struct FileTransaction<'a> {
    store: &'a FileCounterStore,
    state: CounterState,
    _lock: LockGuard,
}

impl CounterTransaction for FileTransaction<'_> {
    fn state(&self) -> &CounterState {
        &self.state
    }

    fn commit(self: Box<Self>, state: CounterState) -> Result<()> {
        self.store.write_atomic(&state)
    }
}

impl CounterStore for FileCounterStore {
    fn begin(&self) -> Result<Box<dyn CounterTransaction + '_>> {
        let lock = self.acquire()?;
        let state = self.load()?;
        Ok(Box::new(FileTransaction {
            store: self,
            state,
            _lock: lock,
        }))
    }
}
