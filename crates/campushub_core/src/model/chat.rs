//! Chat conversation and message records.
//!
//! Messages never leave the local store; there is no transport. Sending
//! appends locally and updates the conversation summary.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Me,
    Peer,
}

/// Conversation list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: EntityId,
    pub peer: String,
    pub last_message: String,
    pub unread: u32,
    pub time_label: String,
}

impl Entity for Conversation {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// One message inside a conversation. Ids are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: EntityId,
    pub conversation_id: EntityId,
    pub sender: Sender,
    pub content: String,
}

impl Entity for ChatMessage {
    fn id(&self) -> EntityId {
        self.id
    }
}
