//! In-process event bus for same-page module communication.
//!
//! # Responsibility
//! - Deliver typed events to registered subscribers synchronously.
//! - Validate subscriber identity and reject duplicates.
//!
//! # Invariants
//! - Delivery order follows subscriber id order (deterministic).
//! - Publishing never fails; a bus with no subscribers is a no-op.

use crate::nav::ModuleId;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Events carried between modules while both ends are mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// Ask the shell to switch the active module.
    ModuleChangeRequested { module: ModuleId },
    /// A list card was clicked and deep-links into another module.
    /// `snapshot` is the clicked entity serialized as JSON.
    PostClicked {
        module: ModuleId,
        element_id: String,
        snapshot: String,
    },
    /// Total unread chat count changed.
    UnreadCountChanged { total_unread: u32 },
}

/// Subscriber contract for bus consumers.
pub trait EventSubscriber {
    /// Stable id; lowercase ascii, digits, `_` and `-` only.
    fn subscriber_id(&self) -> &str;
    fn on_event(&self, event: &CoreEvent);
}

/// Registration/lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    InvalidSubscriberId(String),
    DuplicateSubscriberId(String),
    SubscriberNotFound(String),
}

impl Display for EventBusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSubscriberId(value) => write!(f, "subscriber id is invalid: {value}"),
            Self::DuplicateSubscriberId(value) => {
                write!(f, "subscriber id already registered: {value}")
            }
            Self::SubscriberNotFound(value) => write!(f, "subscriber not found: {value}"),
        }
    }
}

impl Error for EventBusError {}

/// Synchronous in-process pub/sub channel.
#[derive(Default)]
pub struct EventBus {
    subscribers: BTreeMap<String, Arc<dyn EventSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one subscriber.
    pub fn register(&mut self, subscriber: Arc<dyn EventSubscriber>) -> Result<(), EventBusError> {
        let id = subscriber.subscriber_id().trim().to_string();
        if !is_valid_subscriber_id(&id) {
            return Err(EventBusError::InvalidSubscriberId(id));
        }
        if self.subscribers.contains_key(id.as_str()) {
            return Err(EventBusError::DuplicateSubscriberId(id));
        }

        self.subscribers.insert(id, subscriber);
        Ok(())
    }

    /// Removes one subscriber (modules unregister on unmount).
    pub fn unregister(&mut self, subscriber_id: &str) -> Result<(), EventBusError> {
        let normalized = subscriber_id.trim();
        if self.subscribers.remove(normalized).is_none() {
            return Err(EventBusError::SubscriberNotFound(normalized.to_string()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Returns sorted subscriber ids.
    pub fn subscriber_ids(&self) -> Vec<String> {
        self.subscribers.keys().cloned().collect()
    }

    /// Delivers one event to every subscriber, in id order.
    pub fn publish(&self, event: &CoreEvent) {
        for subscriber in self.subscribers.values() {
            subscriber.on_event(event);
        }
    }
}

fn is_valid_subscriber_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{CoreEvent, EventBus, EventBusError, EventSubscriber};
    use crate::nav::ModuleId;
    use std::cell::RefCell;
    use std::sync::Arc;

    struct RecordingSubscriber {
        id: String,
        seen: RefCell<Vec<CoreEvent>>,
    }

    impl RecordingSubscriber {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl EventSubscriber for RecordingSubscriber {
        fn subscriber_id(&self) -> &str {
            &self.id
        }

        fn on_event(&self, event: &CoreEvent) {
            self.seen.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn register_validates_and_rejects_duplicates() {
        let mut bus = EventBus::new();
        bus.register(Arc::new(RecordingSubscriber::new("module-switcher")))
            .unwrap();

        let duplicate = bus.register(Arc::new(RecordingSubscriber::new("module-switcher")));
        assert_eq!(
            duplicate,
            Err(EventBusError::DuplicateSubscriberId(
                "module-switcher".to_string()
            ))
        );

        let invalid = bus.register(Arc::new(RecordingSubscriber::new("Bad Id!")));
        assert!(matches!(invalid, Err(EventBusError::InvalidSubscriberId(_))));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn publish_reaches_every_subscriber() {
        let mut bus = EventBus::new();
        let first = Arc::new(RecordingSubscriber::new("scroll-handler"));
        let second = Arc::new(RecordingSubscriber::new("module-switcher"));
        bus.register(first.clone()).unwrap();
        bus.register(second.clone()).unwrap();

        bus.publish(&CoreEvent::ModuleChangeRequested {
            module: ModuleId::Chat,
        });

        assert_eq!(first.seen.borrow().len(), 1);
        assert_eq!(second.seen.borrow().len(), 1);
    }

    #[test]
    fn unregister_removes_delivery() {
        let mut bus = EventBus::new();
        let subscriber = Arc::new(RecordingSubscriber::new("unread-badge"));
        bus.register(subscriber.clone()).unwrap();
        bus.unregister("unread-badge").unwrap();

        bus.publish(&CoreEvent::UnreadCountChanged { total_unread: 3 });
        assert!(subscriber.seen.borrow().is_empty());
        assert!(matches!(
            bus.unregister("unread-badge"),
            Err(EventBusError::SubscriberNotFound(_))
        ));
    }
}
