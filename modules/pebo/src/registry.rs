//! Event name → ordered listeners.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::traits::Listener;

/// Stores listeners per event name. Knows nothing about firing.
///
/// A listener registered twice under the same name is invoked twice, in
/// registration order. Unknown names read as an empty sequence.
pub struct ListenerRegistry<O, A> {
    events: HashMap<String, Vec<Arc<dyn Listener<O, A>>>>,
}

impl<O: 'static, A: 'static> ListenerRegistry<O, A> {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    /// Append a listener to the sequence for `event_name`.
    pub fn register(
        &mut self,
        event_name: impl Into<String>,
        listener: impl Listener<O, A>,
    ) -> &mut Self {
        let event_name = event_name.into();
        let listeners = self.events.entry(event_name.clone()).or_default();
        listeners.push(Arc::new(listener));
        trace!(
            event = event_name.as_str(),
            position = listeners.len() - 1,
            "Registered listener"
        );
        self
    }

    /// Listeners for `event_name` in registration order.
    pub fn listeners_for(&self, event_name: &str) -> &[Arc<dyn Listener<O, A>>] {
        self.events
            .get(event_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners_for(event_name).len()
    }

    /// Names with at least one listener, unordered.
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}

impl<O: 'static, A: 'static> Default for ListenerRegistry<O, A> {
    fn default() -> Self {
        Self::new()
    }
}
