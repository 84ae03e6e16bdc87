//! Console message notification
//!
//! The hosted runtime reports console output as `ConsoleMessage` values.
//! `ConsoleMessageListeners` fans each message out to every subscriber.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A console message raised by the hosted runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    message: String,
    source: String,
    line: i32,
}

impl ConsoleMessage {
    /// Create a console message
    pub fn new(message: impl Into<String>, source: impl Into<String>, line: i32) -> Self {
        Self {
            message: message.into(),
            source: source.into(),
            line,
        }
    }

    /// The message text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the message came from (script URL)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Line number that produced the message
    pub fn line(&self) -> i32 {
        self.line
    }
}

/// A console message listener
pub type ConsoleListenerFn = Arc<dyn Fn(&ConsoleMessage) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Fan-out list of console message listeners.
pub struct ConsoleMessageListeners {
    listeners: RwLock<Vec<(ListenerId, ConsoleListenerFn)>>,
    next_id: AtomicU64,
}

impl ConsoleMessageListeners {
    /// Create an empty listener list
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Add a listener; it receives every message emitted afterwards
    pub fn subscribe(
        &self,
        listener: impl Fn(&ConsoleMessage) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver a message to every listener in subscription order.
    ///
    /// Returns the number of listeners notified.
    pub fn emit(&self, message: &ConsoleMessage) -> usize {
        // Snapshot so listeners may subscribe/unsubscribe while being notified
        let snapshot: Vec<ConsoleListenerFn> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in &snapshot {
            listener(message);
        }
        snapshot.len()
    }

    /// Get the number of listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Check if there are no listeners
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}

impl Default for ConsoleMessageListeners {
    fn default() -> Self {
        Self::new()
    }
}
