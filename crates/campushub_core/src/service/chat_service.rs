//! Chat use-case service.
//!
//! # Responsibility
//! - Project the conversation list by recency label.
//! - Append locally-sent messages and keep conversation summaries current.
//! - Broadcast the total unread count when a conversation is read.
//!
//! # Invariants
//! - Message ids are epoch milliseconds within their conversation.
//! - No transport exists; messages never leave the local store.

use crate::model::chat::{ChatMessage, Conversation, Sender};
use crate::nav::{CoreEvent, EventBus};
use crate::repo::{CollectionRepository, EntityId};
use crate::seed;
use crate::service::{validate_required, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::{ListQuery, RecencyRankTable, SortOrder};

const CHAT_TIME_LABELS: &[&str] = &["刚刚", "5分钟前", "1小时前", "昨天", "2天前"];

/// Chat facade over conversations and their message log.
pub struct ChatService<'s> {
    conversations: CollectionRepository<'s, Conversation>,
    messages: CollectionRepository<'s, ChatMessage>,
    rank_table: RecencyRankTable,
}

impl<'s> ChatService<'s> {
    pub fn open(storage: &'s dyn KvStorage) -> Self {
        Self::open_with_seed(storage, seed::conversations())
    }

    pub fn open_with_seed(storage: &'s dyn KvStorage, seed: Vec<Conversation>) -> Self {
        Self {
            conversations: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("chat", "conversations"),
                seed,
            ),
            messages: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("chat", "messages"),
                Vec::new(),
            ),
            rank_table: RecencyRankTable::from_labels(CHAT_TIME_LABELS),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.conversations.all()
    }

    pub fn get(&self, id: EntityId) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    pub fn list_conversations(&self, order: SortOrder) -> Vec<Conversation> {
        let query = ListQuery::new()
            .sort_by(|a: &Conversation, b: &Conversation| {
                self.rank_table.compare_desc(&a.time_label, &b.time_label)
            })
            .order(order);
        query.apply(self.conversations.all())
    }

    pub fn messages_in(&self, conversation_id: EntityId) -> Vec<ChatMessage> {
        self.messages
            .all()
            .iter()
            .filter(|message| message.conversation_id == conversation_id)
            .cloned()
            .collect()
    }

    /// Appends a locally-sent message and refreshes the conversation row.
    pub fn send_message(
        &mut self,
        conversation_id: EntityId,
        content: impl Into<String>,
        now_ms: i64,
    ) -> ServiceResult<ChatMessage> {
        let content = content.into();
        validate_required(&[("message", &content)])?;
        if self.conversations.get(conversation_id).is_none() {
            return Err(ServiceError::NotFound(conversation_id));
        }

        let message = ChatMessage {
            id: now_ms,
            conversation_id,
            sender: Sender::Me,
            content: content.clone(),
        };
        self.messages.insert(message.clone());
        self.conversations.update(conversation_id, |conversation| {
            conversation.last_message = content;
            conversation.time_label = "刚刚".to_string();
        })?;
        Ok(message)
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations
            .all()
            .iter()
            .map(|conversation| conversation.unread)
            .sum()
    }

    /// Marks one conversation read and broadcasts the new total unread
    /// count for the sidebar badge.
    pub fn mark_read(&mut self, conversation_id: EntityId, bus: &EventBus) -> ServiceResult<u32> {
        self.conversations
            .update(conversation_id, |conversation| conversation.unread = 0)?;

        let total_unread = self.total_unread();
        bus.publish(&CoreEvent::UnreadCountChanged { total_unread });
        Ok(total_unread)
    }
}
