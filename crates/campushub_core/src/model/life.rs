//! Life-sharing post records.

use crate::model::academic::Comment;
use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Life-sharing post with inline comments.
///
/// Image entries are display paths only; there is no upload or file storage
/// behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifePost {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub images: Vec<String>,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub time_label: String,
}

impl Entity for LifePost {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.author.as_str())
    }
}
