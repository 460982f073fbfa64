//! Home feed post records.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Feed post category used by the home filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedCategory {
    Study,
    Activity,
    Help,
    Chatter,
}

impl FeedCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Activity => "activity",
            Self::Help => "help",
            Self::Chatter => "chatter",
        }
    }
}

/// One home feed post.
///
/// `time_label` is a display string such as `刚刚` or `1小时前`; it is the
/// source of truth for recency ordering via the feed rank table, not a
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: FeedCategory,
    pub views: u32,
    pub likes: u32,
    pub replies: u32,
    pub time_label: String,
    /// Element id in the source module when this card deep-links elsewhere
    /// (e.g. `academic-tech-7`); `None` for posts native to the feed.
    pub origin_element: Option<String>,
}

impl Entity for FeedPost {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.author.as_str())
    }
}

/// Derived display projection for feed cards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostPreview {
    /// Plain-text summary with markdown syntax stripped, capped at 100 chars.
    pub text: Option<String>,
    /// First embedded image path, when the content carries one.
    pub image: Option<String>,
}
