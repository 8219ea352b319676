//! Pattern waiters over console output.
//!
//! Callers register a pattern with a deadline and get back a `Waiter`. Every console line
//! forwarded by the session is tested against every registered pattern; the first matching
//! line resolves the waiter. A waiter whose deadline passes first is rejected with
//! `ConsoleError::Timeout`. Either way the registration is removed exactly once: whichever
//! side takes the entry out of the map owns its reply channel.
//!
//! The deadline task runs even if the caller drops its `Waiter`, so abandoned registrations
//! are always cleaned up.

use std::{collections::HashMap, sync::Arc, time::Duration};

use dioxus_logger::tracing;
use parking_lot::Mutex;
use regex::Regex;
use tokio::{sync::oneshot, task::JoinHandle};

use crate::error::console::ConsoleError;

type Reply = oneshot::Sender<Result<String, ConsoleError>>;

struct Registration {
    pattern: Regex,
    reply: Reply,
    deadline: JoinHandle<()>,
}

#[derive(Default)]
struct Registrations {
    next_id: u64,
    entries: HashMap<u64, Registration>,
}

/// Registry of pending waiters, keyed by a generated id.
#[derive(Clone, Default)]
pub struct WaiterRegistry {
    inner: Arc<Mutex<Registrations>>,
}

/// A pending registration. Resolve it with [`Waiter::wait`].
pub struct Waiter {
    id: u64,
    reply: oneshot::Receiver<Result<String, ConsoleError>>,
}

impl Waiter {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the first matching line, the deadline, or the registry being cleared.
    pub async fn wait(self) -> Result<String, ConsoleError> {
        self.reply.await.unwrap_or(Err(ConsoleError::Closed))
    }
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pattern` and arms its deadline.
    ///
    /// Registration happens immediately, before the returned waiter is awaited, so a
    /// command sent after this call cannot race ahead of its own waiter.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register(&self, pattern: Regex, timeout: Duration) -> Waiter {
        let (reply, receiver) = oneshot::channel();

        let mut registrations = self.inner.lock();
        let id = registrations.next_id;
        registrations.next_id += 1;

        let registry = self.clone();
        let deadline = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            registry.expire(id, timeout);
        });

        tracing::trace!("Registered console waiter {} for /{}/", id, pattern);
        registrations.entries.insert(
            id,
            Registration {
                pattern,
                reply,
                deadline,
            },
        );

        Waiter {
            id,
            reply: receiver,
        }
    }

    /// Resolves every waiter whose pattern matches `line`.
    ///
    /// # Returns
    /// - Number of waiters resolved by this line
    pub fn dispatch(&self, line: &str) -> usize {
        let matched: Vec<(u64, Registration)> = {
            let mut registrations = self.inner.lock();
            let ids: Vec<u64> = registrations
                .entries
                .iter()
                .filter(|(_, registration)| registration.pattern.is_match(line))
                .map(|(id, _)| *id)
                .collect();

            ids.into_iter()
                .filter_map(|id| registrations.entries.remove(&id).map(|r| (id, r)))
                .collect()
        };

        for (id, registration) in &matched {
            tracing::trace!("Console waiter {} matched: {}", id, line);
            registration.deadline.abort();
        }

        let count = matched.len();
        for (_, registration) in matched {
            // The caller may have stopped waiting; the registration is gone either way.
            let _ = registration.reply.send(Ok(line.to_string()));
        }

        count
    }

    /// Drops every pending waiter. Their `wait` calls return `ConsoleError::Closed`.
    pub fn clear(&self) {
        let drained: Vec<Registration> = self
            .inner
            .lock()
            .entries
            .drain()
            .map(|(_, registration)| registration)
            .collect();

        if !drained.is_empty() {
            tracing::debug!("Dropping {} pending console waiters", drained.len());
        }

        for registration in drained {
            registration.deadline.abort();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn expire(&self, id: u64, timeout: Duration) {
        let registration = self.inner.lock().entries.remove(&id);

        if let Some(registration) = registration {
            tracing::trace!("Console waiter {} timed out after {:?}", id, timeout);
            let _ = registration
                .reply
                .send(Err(ConsoleError::Timeout { timeout }));
        }
    }
}
