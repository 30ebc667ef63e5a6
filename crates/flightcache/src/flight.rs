//! In-flight call registry
//!
//! Concurrent callers for the same key either claim the key and do the
//! work (the leader) or join the outstanding call and block until the
//! leader publishes. The registry lock is held only for the claim; each
//! call has its own lock and condvar for the wait, so unrelated keys
//! never serialize behind each other.

use std::collections::HashMap;
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

enum State<T> {
    Pending,
    Done(T),
    Abandoned,
}

/// A single outstanding call, shared by its leader and every waiter
pub struct InFlight<T> {
    state: Mutex<State<T>>,
    done: Condvar,
}

impl<T: Clone> InFlight<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(State::Pending),
            done: Condvar::new(),
        }
    }

    /// Block until the leader publishes.
    ///
    /// Returns `None` if the leader was dropped without a result.
    pub fn wait(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                State::Pending => self.done.wait(&mut state),
                State::Done(value) => return Some(value.clone()),
                State::Abandoned => return None,
            }
        }
    }

    fn publish(&self, outcome: State<T>) {
        *self.state.lock() = outcome;
        self.done.notify_all();
    }
}

/// Outcome of [`FlightGroup::claim`]
pub enum Claim<'a, T: Clone> {
    /// Caller owns the call and must complete it
    Leader(Leader<'a, T>),
    /// Another caller owns the call; wait on it
    Waiter(Arc<InFlight<T>>),
}

/// Exclusive right to perform the call for one key.
///
/// Dropping it without [`complete`](Leader::complete) releases the key and
/// wakes waiters with nothing, so they can claim again.
pub struct Leader<'a, T: Clone> {
    group: &'a FlightGroup<T>,
    key: String,
    call: Arc<InFlight<T>>,
    published: bool,
}

impl<T: Clone> Leader<'_, T> {
    /// Key this leader owns
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Deregister the key and hand `value` to every waiter
    pub fn complete(mut self, value: T) {
        self.group.release(&self.key, &self.call);
        self.call.publish(State::Done(value));
        self.published = true;
    }
}

impl<T: Clone> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        if !self.published {
            warn!(key = %self.key, "leader dropped without a result");
            self.group.release(&self.key, &self.call);
            self.call.publish(State::Abandoned);
        }
    }
}

/// Registry of in-flight calls keyed by lookup key
pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, Arc<InFlight<T>>, RandomState>>,
}

impl<T> Default for FlightGroup<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::default()),
        }
    }
}

impl<T: Clone> FlightGroup<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `key` or join the call already registered for it
    pub fn claim(&self, key: &str) -> Claim<'_, T> {
        let mut calls = self.calls.lock();
        if let Some(call) = calls.get(key) {
            return Claim::Waiter(Arc::clone(call));
        }

        let call = Arc::new(InFlight::new());
        calls.insert(key.to_string(), Arc::clone(&call));
        Claim::Leader(Leader {
            group: self,
            key: key.to_string(),
            call,
            published: false,
        })
    }

    /// Run `work` once for all concurrent callers of `key`.
    ///
    /// The first caller runs `work`; callers arriving while it runs block
    /// and receive a clone of its result.
    pub fn run<F>(&self, key: &str, work: F) -> T
    where
        F: FnOnce() -> T,
    {
        loop {
            match self.claim(key) {
                Claim::Leader(leader) => {
                    debug!(key, "leading call");
                    let value = work();
                    leader.complete(value.clone());
                    return value;
                }
                Claim::Waiter(call) => {
                    debug!(key, "joining in-flight call");
                    if let Some(value) = call.wait() {
                        return value;
                    }
                    debug!(key, "in-flight call abandoned, claiming again");
                }
            }
        }
    }

    /// Get the number of keys with an outstanding call
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Check if no call is outstanding
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    fn release(&self, key: &str, call: &Arc<InFlight<T>>) {
        let mut calls = self.calls.lock();
        if calls.get(key).is_some_and(|c| Arc::ptr_eq(c, call)) {
            calls.remove(key);
        }
    }
}
