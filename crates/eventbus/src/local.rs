// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local subscriber registry: synchronous handlers invoked per accepted
//! event, with an optional type filter and a one-shot flag. A handler
//! panic is caught and logged; it never reaches other subscribers.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fleet_core::Event;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    filter: Option<Vec<String>>,
    one_shot: bool,
    handler: Handler,
}

impl Subscriber {
    fn matches(&self, event: &Event) -> bool {
        match &self.filter {
            None => true,
            Some(types) => types.iter().any(|t| t == event.type_tag()),
        }
    }
}

/// Registry of in-process event handlers.
#[derive(Default)]
pub struct LocalSubscribers {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl LocalSubscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events matching `filter` (`None` matches
    /// every event). A `one_shot` subscriber is removed after its first
    /// invocation.
    pub fn subscribe(
        &self,
        filter: Option<Vec<String>>,
        one_shot: bool,
        handler: impl Fn(&Event) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push(Subscriber {
            id,
            filter,
            one_shot,
            handler: Arc::new(handler),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|s| s.id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Invoke every matching handler with `event`. A handler that panics
    /// is isolated via `catch_unwind` and logged; it does not prevent
    /// remaining handlers from running or affect future dispatches.
    /// One-shot subscribers fire at most once, then are removed.
    pub fn dispatch(&self, event: &Event) {
        let matched: Vec<(SubscriptionId, Handler, bool)> = {
            let subscribers = self.subscribers.lock();
            subscribers
                .iter()
                .filter(|s| s.matches(event))
                .map(|s| (s.id, s.handler.clone(), s.one_shot))
                .collect()
        };

        let mut fired_one_shot = Vec::new();
        for (id, handler, one_shot) in matched {
            let call = AssertUnwindSafe(|| handler(event));
            if std::panic::catch_unwind(call).is_err() {
                tracing::error!(subscriber = id.0, "event subscriber panicked; isolating");
            }
            if one_shot {
                fired_one_shot.push(id);
            }
        }

        if !fired_one_shot.is_empty() {
            self.subscribers.lock().retain(|s| !fired_one_shot.contains(&s.id));
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
