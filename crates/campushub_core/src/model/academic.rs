//! Academic resource records: courses, shared materials, tech posts, comments.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Catalog course entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    pub teacher: String,
    pub major: String,
    pub credits: u32,
    pub rating: f32,
}

impl Entity for Course {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Shared study material category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    Notes,
    PastExam,
    Courseware,
    Ebook,
}

/// One shared study material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: EntityId,
    pub title: String,
    pub category: MaterialCategory,
    pub uploader: String,
    pub downloads: u32,
    /// Display size string, e.g. `2.4MB`. No real file exists behind it.
    pub size_label: String,
    pub time_label: String,
}

impl Entity for Material {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.uploader.as_str())
    }
}

/// Tech-discussion post under the academic module's `tech` tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechPost {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub likes: u32,
    pub replies: u32,
    pub time_label: String,
}

impl TechPost {
    /// Stable DOM element id used by cross-module deep links.
    pub fn element_id(&self) -> String {
        format!("academic-tech-{}", self.id)
    }
}

impl Entity for TechPost {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.author.as_str())
    }
}

/// One comment under a tech or life post.
///
/// Comment ids are epoch milliseconds at creation time, unlike the `max+1`
/// ids used by top-level collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub author: String,
    pub content: String,
    pub time_label: String,
}

impl Entity for Comment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.author.as_str())
    }
}
