//! # Webhook Replay Guard
//!
//! Bounded LRU of webhook event ids already dispatched. The provider delivers
//! at-least-once; repeated deliveries of the same event id are acknowledged
//! but not re-dispatched. In-memory only: a restart forgets history, which at
//! worst re-logs a completed session.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default guard capacity. Event ids are short strings; a few thousand covers
/// well beyond the provider's retry window.
const DEFAULT_REPLAY_CAPACITY: usize = 4096;

/// Bounded LRU of seen webhook event ids.
#[derive(Clone)]
pub struct ReplayGuard {
    inner: Arc<Mutex<LruCache<String, ()>>>,
}

impl ReplayGuard {
    /// Create a guard with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Create a guard with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).expect("1 is non-zero"));
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(cap))),
        }
    }

    /// Record an event id. Returns `true` on first delivery, `false` if the
    /// id was already seen (the duplicate should be acknowledged, not
    /// re-dispatched).
    pub fn first_delivery(&self, event_id: &str) -> bool {
        let mut seen = self.inner.lock();
        if seen.get(event_id).is_some() {
            return false;
        }
        seen.put(event_id.to_string(), ());
        true
    }

    /// Current number of remembered event ids.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the guard is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new()
    }
}
