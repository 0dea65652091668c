//! Results-changed notification.
//!
//! Two delivery paths share one [`ObserverRegistry`]: synchronous callbacks for
//! hosts that render inline, and a broadcast channel for hosts that poll from
//! an event loop. Neither carries a payload; observers re-fetch the current
//! result set from the engine.

use tokio::sync::broadcast;
use tracing::trace;

/// Capacity of the results-changed broadcast channel.
const CHANNEL_CAPACITY: usize = 16;

/// Event emitted after every successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsChanged;

/// Handle returned by [`ObserverRegistry::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn Fn() + Send + Sync>;

/// Registered results-changed callbacks plus the broadcast sender.
pub struct ObserverRegistry {
    next_id: u64,
    callbacks: Vec<(ObserverId, Callback)>,
    tx: broadcast::Sender<ResultsChanged>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            next_id: 0,
            callbacks: Vec::new(),
            tx,
        }
    }

    /// Register a callback invoked once per notification.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.callbacks.len() != before
    }

    /// Open a new channel receiver. It sees every notification sent after
    /// this call.
    pub fn channel(&self) -> broadcast::Receiver<ResultsChanged> {
        self.tx.subscribe()
    }

    /// Invoke every callback and broadcast one [`ResultsChanged`].
    pub fn notify(&self) {
        for (_, callback) in &self.callbacks {
            callback();
        }
        // No receivers is fine.
        let receivers = self.tx.send(ResultsChanged).unwrap_or(0);
        trace!(
            callbacks = self.callbacks.len(),
            receivers,
            "Results-changed notification sent"
        );
    }

    /// Number of registered callbacks (channel receivers not included).
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("callbacks", &self.callbacks.len())
            .field("receivers", &self.tx.receiver_count())
            .finish()
    }
}
