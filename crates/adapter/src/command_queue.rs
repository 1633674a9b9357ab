// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rate-limited, single-in-flight command queue. A single background
//! worker drains `pending`, enforcing the minimum send spacing and the
//! per-command timeout; a disconnect rejects everything still queued.

use std::collections::VecDeque;
use std::time::Duration;

use fleet_core::Clock;
use tokio::sync::oneshot;

use crate::error::AdapterError;

const FAILURE_SUBSTRINGS: &[&str] = &["unknown command", "no such player", "error", "failed"];

/// True if a non-empty response text indicates a command-level failure
/// even though the transport call itself succeeded.
pub fn response_indicates_failure(response: &str) -> bool {
    if response.is_empty() {
        return false;
    }
    let lower = response.to_lowercase();
    FAILURE_SUBSTRINGS.iter().any(|needle| lower.contains(needle))
}

pub struct QueueEntry {
    pub command: String,
    pub reply: oneshot::Sender<Result<String, AdapterError>>,
    pub enqueued_at_ms: u64,
}

/// FIFO of not-yet-sent commands, plus the high-water mark metric.
pub struct CommandQueue {
    entries: VecDeque<QueueEntry>,
    high_water: usize,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            high_water: 0,
        }
    }

    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push_back(entry);
        self.high_water = self.high_water.max(self.entries.len());
    }

    pub fn pop(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water
    }

    /// Reject every pending entry with a disconnect error, for use when
    /// the transport drops while commands are queued.
    pub fn drain_with_disconnect(&mut self) {
        while let Some(entry) = self.entries.pop_front() {
            entry.reply.send(Err(AdapterError::Disconnected)).ok();
        }
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Enqueue `command`, returning a future that resolves once it has been
/// sent (or timed out, or rejected by a disconnect).
pub fn enqueue<C: Clock>(
    queue: &parking_lot::Mutex<CommandQueue>,
    clock: &C,
    command: String,
) -> oneshot::Receiver<Result<String, AdapterError>> {
    let (tx, rx) = oneshot::channel();
    queue.lock().push(QueueEntry {
        command,
        reply: tx,
        enqueued_at_ms: clock.epoch_ms(),
    });
    rx
}

/// Wrap a send attempt in the per-command timeout, classifying the
/// outcome against the failure-substring list.
pub async fn send_with_timeout<F>(timeout: Duration, send: F) -> Result<String, AdapterError>
where
    F: std::future::Future<Output = Result<String, String>>,
{
    match tokio::time::timeout(timeout, send).await {
        Ok(Ok(response)) => {
            if response_indicates_failure(&response) {
                Err(AdapterError::CommandFailed(response))
            } else {
                Ok(response)
            }
        }
        Ok(Err(reason)) => Err(AdapterError::CommandFailed(reason)),
        Err(_) => Err(AdapterError::Timeout(timeout)),
    }
}

#[cfg(test)]
#[path = "command_queue_tests.rs"]
mod tests;
