//! Typed notifications for code outside the update loop
//!
//! Subscribers register for one [`EventKind`] and are called in
//! subscription order when a matching [`ServiceEvent`] is published.

use serde::Serialize;

use crate::model::{DocumentId, StructureModel};

/// Something observers may care about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// The service is ready to receive document signals
    Initialized,
    /// A new outline was applied for the active document
    StructureChanged {
        document_id: DocumentId,
        items: StructureModel,
    },
    /// The active document has no analyzer
    Unsupported { content_type: String },
    /// The search overlay's query or matches changed
    FilterChanged { query: String, visible: usize },
    /// The service is going away; no further events follow
    Shutdown,
}

/// Event discriminant used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Initialized,
    StructureChanged,
    Unsupported,
    FilterChanged,
    Shutdown,
}

impl ServiceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ServiceEvent::Initialized => EventKind::Initialized,
            ServiceEvent::StructureChanged { .. } => EventKind::StructureChanged,
            ServiceEvent::Unsupported { .. } => EventKind::Unsupported,
            ServiceEvent::FilterChanged { .. } => EventKind::FilterChanged,
            ServiceEvent::Shutdown => EventKind::Shutdown,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback type for event subscribers
pub type EventHandler = Box<dyn FnMut(&ServiceEvent) + Send>;

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: EventHandler,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&ServiceEvent) + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Call every handler subscribed to this event's kind
    pub fn publish(&mut self, event: &ServiceEvent) {
        let kind = event.kind();
        tracing::trace!("Publishing {:?}", kind);
        for subscription in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            (subscription.handler)(event);
        }
    }

    /// Drop all subscribers
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let log = Arc::clone(&log);
            bus.subscribe(EventKind::Initialized, move |_| log.lock().unwrap().push(tag));
        }
        bus.publish(&ServiceEvent::Initialized);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_only_matching_kind_is_called() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::new();
        let c = Arc::clone(&count);
        bus.subscribe(EventKind::Shutdown, move |_| *c.lock().unwrap() += 1);

        bus.publish(&ServiceEvent::Initialized);
        assert_eq!(*count.lock().unwrap(), 0);
        bus.publish(&ServiceEvent::Shutdown);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::new();
        let c = Arc::clone(&count);
        let id = bus.subscribe(EventKind::Initialized, move |_| *c.lock().unwrap() += 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&ServiceEvent::Initialized);
        assert_eq!(*count.lock().unwrap(), 0);
        assert!(bus.is_empty());
    }
}
