//! Publish/subscribe list for pose samples.
//!
//! The bus is owned by the session. Listeners are plain callbacks and are
//! invoked synchronously, in subscription order, for every published sample.

use tracing::debug;

use crate::tracking::{PoseSample, SubscriptionId};

type PoseListener = Box<dyn FnMut(&PoseSample)>;

/// Ordered list of pose listeners.
#[derive(Default)]
pub struct PoseBus {
    listeners: Vec<(SubscriptionId, PoseListener)>,
    next_id: u64,
    published: u64,
}

impl PoseBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives every sample published afterwards.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PoseSample) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Deliver a sample to every listener.
    pub fn publish(&mut self, sample: &PoseSample) {
        debug!(
            "Publishing pose for method {} (frame {}, detected={}) to {} listener(s)",
            sample.method,
            sample.frame_id,
            sample.is_detected,
            self.listeners.len()
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(sample);
        }
        self.published += 1;
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Total number of samples published on this bus.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl std::fmt::Debug for PoseBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseBus")
            .field("listeners", &self.listeners.len())
            .field("published", &self.published)
            .finish()
    }
}
