use campushub_core::model::chat::Sender;
use campushub_core::nav::{CoreEvent, EventBus, EventSubscriber};
use campushub_core::{ChatService, MemoryKvStorage, ServiceError, SortOrder};
use std::cell::RefCell;
use std::sync::Arc;

struct UnreadBadge {
    seen: RefCell<Vec<u32>>,
}

impl UnreadBadge {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: RefCell::new(Vec::new()),
        })
    }
}

impl EventSubscriber for UnreadBadge {
    fn subscriber_id(&self) -> &str {
        "unread-badge"
    }

    fn on_event(&self, event: &CoreEvent) {
        if let CoreEvent::UnreadCountChanged { total_unread } = event {
            self.seen.borrow_mut().push(*total_unread);
        }
    }
}

#[test]
fn conversations_sort_by_recency_label() {
    let storage = MemoryKvStorage::new();
    let service = ChatService::open(&storage);

    let listed = service.list_conversations(SortOrder::Desc);
    assert_eq!(listed[0].time_label, "刚刚");

    let asc = service.list_conversations(SortOrder::Asc);
    let mut reversed = listed.clone();
    reversed.reverse();
    assert_eq!(asc, reversed);
}

#[test]
fn send_message_appends_locally_and_updates_summary() {
    let storage = MemoryKvStorage::new();
    let mut service = ChatService::open(&storage);

    let message = service
        .send_message(2, "面试几点开始？", 1_754_500_000_123)
        .unwrap();
    assert_eq!(message.id, 1_754_500_000_123);
    assert_eq!(message.sender, Sender::Me);

    let log = service.messages_in(2);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].content, "面试几点开始？");
    assert!(service.messages_in(1).is_empty());

    let conversation = service.get(2).unwrap();
    assert_eq!(conversation.last_message, "面试几点开始？");
    assert_eq!(conversation.time_label, "刚刚");

    assert!(matches!(
        service.send_message(2, "  ", 1),
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.send_message(99, "喂", 1),
        Err(ServiceError::NotFound(99))
    ));
}

#[test]
fn mark_read_zeroes_one_row_and_broadcasts_the_total() {
    let storage = MemoryKvStorage::new();
    let mut service = ChatService::open(&storage);
    let mut bus = EventBus::new();
    let badge = UnreadBadge::new();
    bus.register(badge.clone()).unwrap();

    // Seed carries 2 + 0 + 1 unread.
    assert_eq!(service.total_unread(), 3);

    let total = service.mark_read(1, &bus).unwrap();
    assert_eq!(total, 1);
    assert_eq!(service.get(1).unwrap().unread, 0);
    assert_eq!(*badge.seen.borrow(), vec![1]);

    let total = service.mark_read(3, &bus).unwrap();
    assert_eq!(total, 0);
    assert_eq!(*badge.seen.borrow(), vec![1, 0]);
}

#[test]
fn chat_state_survives_reopen() {
    let storage = MemoryKvStorage::new();
    {
        let mut service = ChatService::open(&storage);
        let bus = EventBus::new();
        service.send_message(1, "保存我", 42).unwrap();
        service.mark_read(1, &bus).unwrap();
    }

    let service = ChatService::open(&storage);
    assert_eq!(service.messages_in(1).len(), 1);
    assert_eq!(service.get(1).unwrap().unread, 0);
    assert_eq!(service.total_unread(), 1);
}
