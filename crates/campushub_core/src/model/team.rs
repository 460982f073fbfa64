//! Team formation records.

use crate::model::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Team-up posting (competition squads, project groups, study pairs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPost {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub organizer: String,
    /// Skills wanted, matched by the team search alongside title,
    /// description and organizer.
    pub skills: Vec<String>,
    pub members: u32,
    pub capacity: u32,
    pub time_label: String,
}

impl Entity for TeamPost {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.organizer.as_str())
    }
}

/// Entry in the local "my teams" collection, created when an application
/// is filed. Its id is allocated from the persisted team-id map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedTeam {
    pub id: EntityId,
    pub team_id: EntityId,
    pub title: String,
}

impl Entity for JoinedTeam {
    fn id(&self) -> EntityId {
        self.id
    }
}
