// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fleet_core::{Clock, Event};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

/// Minimum coalescing window between writes of the same file.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Loads larger than this are rejected rather than parsed.
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error reading/writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("load of {path} ({len} bytes) exceeds the {max} byte cap")]
    TooLarge { path: PathBuf, len: u64, max: u64 },

    #[error("failed to serialize value for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

struct PendingState<T> {
    value: Option<T>,
    flush_scheduled: bool,
}

/// A single JSON-backed file with atomic, debounced writes.
///
/// `load()` never fails on a missing or corrupt file: a missing file
/// yields `T::default()`; an unparseable file is copied aside with a
/// timestamp suffix and `T::default()` is returned. Only an oversized
/// file or a genuine I/O error propagates.
///
/// `schedule_save()` coalesces bursts of mutations into a single write
/// behind a debounce window driven by a background task; `flush()` forces
/// an immediate write, bypassing the debounce (used at shutdown).
pub struct AtomicStore<T, C: Clock> {
    path: PathBuf,
    max_bytes: u64,
    debounce: Duration,
    clock: C,
    pending: Arc<Mutex<PendingState<T>>>,
    events: broadcast::Sender<Event>,
    _marker: PhantomData<T>,
}

impl<T, C> AtomicStore<T, C>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static,
    C: Clock,
{
    pub fn new(path: impl Into<PathBuf>, clock: C) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_BYTES,
            debounce: DEFAULT_DEBOUNCE,
            clock,
            pending: Arc::new(Mutex::new(PendingState {
                value: None,
                flush_scheduled: false,
            })),
            events,
            _marker: PhantomData,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribe to `persistence:saved` / `persistence:loaded` /
    /// `persistence:load_failed` lifecycle events for this store.
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Load the persisted value, or `T::default()` if the file is
    /// missing or corrupt.
    pub async fn load(&self) -> Result<T, PersistenceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.emit(Event::PersistenceLoaded {
                    path: self.path_string(),
                    at: self.clock.epoch_ms(),
                });
                return Ok(T::default());
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "persistence read failed");
                self.emit(Event::PersistenceLoadFailed {
                    path: self.path_string(),
                    reason: e.to_string(),
                    at: self.clock.epoch_ms(),
                });
                return Ok(T::default());
            }
        };

        if bytes.len() as u64 > self.max_bytes {
            return Err(PersistenceError::TooLarge {
                path: self.path.clone(),
                len: bytes.len() as u64,
                max: self.max_bytes,
            });
        }

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                self.emit(Event::PersistenceLoaded {
                    path: self.path_string(),
                    at: self.clock.epoch_ms(),
                });
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt persisted file, backing up and reinitializing");
                self.backup_corrupt(&bytes).await?;
                self.emit(Event::PersistenceLoadFailed {
                    path: self.path_string(),
                    reason: e.to_string(),
                    at: self.clock.epoch_ms(),
                });
                Ok(T::default())
            }
        }
    }

    async fn backup_corrupt(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let backup_path = format!("{}.corrupt-{}", self.path.display(), self.clock.epoch_ms());
        tokio::fs::write(&backup_path, bytes)
            .await
            .map_err(|source| PersistenceError::Io {
                path: PathBuf::from(backup_path),
                source,
            })
    }

    /// Queue `value` to be written once the debounce window elapses,
    /// coalescing with any already-pending value.
    pub fn schedule_save(&self, value: T) {
        let mut pending = self.pending.lock();
        pending.value = Some(value);
        if pending.flush_scheduled {
            return;
        }
        pending.flush_scheduled = true;
        drop(pending);

        let path = self.path.clone();
        let debounce = self.debounce;
        let pending = self.pending.clone();
        let events = self.events.clone();
        let clock = self.clock.clone();

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let value = {
                let mut p = pending.lock();
                p.flush_scheduled = false;
                p.value.take()
            };
            if let Some(value) = value {
                match write_atomic(&path, &value).await {
                    Ok(()) => {
                        let _ = events.send(Event::PersistenceSaved {
                            path: path.display().to_string(),
                            at: clock.epoch_ms(),
                        });
                    }
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "debounced save failed");
                    }
                }
            }
        });
    }

    /// Immediately write any pending value, bypassing the debounce window.
    /// A no-op when nothing is pending.
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        let value = {
            let mut pending = self.pending.lock();
            pending.flush_scheduled = false;
            pending.value.take()
        };
        if let Some(value) = value {
            write_atomic(&self.path, &value).await?;
            self.emit(Event::PersistenceSaved {
                path: self.path_string(),
                at: self.clock.epoch_ms(),
            });
        }
        Ok(())
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }

    fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}

async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp_path = format!("{}.tmp", path.display());
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|source| PersistenceError::Io {
            path: PathBuf::from(&tmp_path),
            source,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
